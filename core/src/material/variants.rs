//! Variant derivation
//!
//! Given a freshly created state, compute its companion states:
//!
//! - With inherited (DEFAULT) blend modes on an active layer, one variant per
//!   concrete blend mode with every inherited layer rewritten to that mode.
//! - Otherwise, one single-layer variant per active layer so overlay layers
//!   can be drawn as separate translucent passes.
//!
//! Companion states are created through the cache without being derived
//! themselves; they are pushed onto `pending` and derived by the caller once
//! this state is finished.

use std::sync::Arc;

use canvas_shared::BlendMode;

use super::attributes::{LayerAttributes, MaterialAttributes};
use super::cache::{CacheInner, Derivation};
use super::state::{MaterialState, VariantRef, Variants};

pub(crate) fn derive(
    state: &MaterialState,
    cache: &mut CacheInner,
    pending: &mut Vec<Arc<MaterialState>>,
) -> Variants {
    let attributes = state.attributes();

    if attributes.has_default_blend_mode() {
        derive_blend_variants(state, &attributes, cache, pending)
    } else {
        derive_depth_variants(state, &attributes, cache, pending)
    }
}

fn derive_blend_variants(
    state: &MaterialState,
    attributes: &MaterialAttributes,
    cache: &mut CacheInner,
    pending: &mut Vec<Arc<MaterialState>>,
) -> Variants {
    let blend = BlendMode::CONCRETE.map(|mode| {
        let mut resolved = *attributes;
        let depth = resolved.sprite_depth;
        for layer in &mut resolved.layers[..depth] {
            if layer.blend_mode.is_default() {
                layer.blend_mode = mode;
            }
        }

        let variant = cache.find_or_create(resolved.encode(), Derivation::Deferred(&mut *pending));
        assert!(
            !variant.blend_mode(0).is_default(),
            "blend variant {:?} of material {} is still DEFAULT",
            mode,
            state.index()
        );
        variant
    });

    tracing::trace!(index = state.index().0, "derived blend mode variants");
    Variants::Unresolved { blend }
}

fn derive_depth_variants(
    state: &MaterialState,
    attributes: &MaterialAttributes,
    cache: &mut CacheInner,
    pending: &mut Vec<Arc<MaterialState>>,
) -> Variants {
    let depth = attributes.sprite_depth;
    if depth == 1 {
        return Variants::Resolved {
            depth: vec![VariantRef::This],
        };
    }

    let mut variants = Vec::with_capacity(depth);

    // Base layer alone keeps its own blend mode
    let mut base = *attributes;
    base.sprite_depth = 1;
    variants.push(VariantRef::Other(
        cache.find_or_create(base.encode(), Derivation::Deferred(&mut *pending)),
    ));

    for layer in 1..depth {
        let source = attributes.layers[layer];
        let mut overlay = *attributes;
        overlay.sprite_depth = 1;
        overlay.layers[0] = LayerAttributes {
            blend_mode: BlendMode::Translucent,
            ..source
        };
        variants.push(VariantRef::Other(
            cache.find_or_create(overlay.encode(), Derivation::Deferred(&mut *pending)),
        ));
    }

    tracing::trace!(index = state.index().0, depth, "derived depth variants");
    Variants::Resolved { depth: variants }
}
