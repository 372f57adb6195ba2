//! Shared test utilities for integration and unit tests

use tracing_subscriber::EnvFilter;

use crate::material::{MaterialCache, MaterialFinder, MaterialState};
use canvas_shared::{BlendMode, MAX_SPRITE_DEPTH};
use std::sync::Arc;

/// Route `tracing` output to the test harness.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Blend modes a layer can take, including inherited
pub const ALL_BLEND_MODES: [Option<BlendMode>; 5] = [
    None,
    Some(BlendMode::Solid),
    Some(BlendMode::Cutout),
    Some(BlendMode::CutoutMipped),
    Some(BlendMode::Translucent),
];

/// Finder configured from a compact seed.
///
/// Different seeds cover depth, per-layer blend mode and every flag, so a
/// range of seeds exercises a broad slice of the pattern space.
pub fn finder_from_seed(seed: u32) -> MaterialFinder {
    let mut finder = MaterialFinder::new();
    let depth = (seed % MAX_SPRITE_DEPTH as u32) as usize + 1;
    finder.sprite_depth(depth).unwrap();

    let mut rest = seed / MAX_SPRITE_DEPTH as u32;
    for layer in 0..MAX_SPRITE_DEPTH {
        let mode = ALL_BLEND_MODES[(rest % 5) as usize];
        rest /= 5;
        finder
            .blend_mode(layer, mode)
            .unwrap()
            .emissive(layer, rest & 1 != 0)
            .unwrap()
            .disable_ao(layer, rest & 2 != 0)
            .unwrap()
            .disable_diffuse(layer, rest & 4 != 0)
            .unwrap()
            .disable_color_index(layer, rest & 8 != 0)
            .unwrap();
        rest = rest.rotate_right(3);
    }
    finder
}

/// Resolve every seed in `seeds` and return the states in order
pub fn resolve_seeds(
    cache: &MaterialCache,
    seeds: impl IntoIterator<Item = u32>,
) -> Vec<Arc<MaterialState>> {
    seeds
        .into_iter()
        .map(|seed| finder_from_seed(seed).find(cache))
        .collect()
}
