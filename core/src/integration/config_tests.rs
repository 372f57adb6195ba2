//! Building caches from configuration and registries

use canvas_shared::{BlendMode, ShaderIndex};

use crate::config::MaterialConfig;
use crate::error::MaterialError;
use crate::material::{MaterialCache, MaterialFinder, StandardMaterials};
use crate::registry::{ConditionRegistry, ShaderRegistry};
use crate::test_utils::{init_tracing, resolve_seeds};

#[test]
fn test_cache_from_config_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas-material.toml");
    std::fs::write(
        &path,
        r#"
[cache]
initial_capacity = 64

[shaders]
default_shader = "canvas:wavy"

[timing]
enabled = true
sample_size = 50
"#,
    )
    .unwrap();

    let config = MaterialConfig::load(&path).unwrap();
    let mut shaders = ShaderRegistry::new("canvas:default");
    let wavy = shaders.register("canvas:wavy").unwrap();

    let cache = MaterialCache::with_config(&config, &shaders).unwrap();
    assert_eq!(cache.default_shader(), wavy);

    // Enough lookups to roll the timer over at least once
    let states = resolve_seeds(&cache, 0..200);
    assert!(states.iter().all(|s| s.shader() == wavy));
    cache.report_timing();
}

#[test]
fn test_cache_config_unknown_default_shader() {
    let mut config = MaterialConfig::default();
    config.shaders.default_shader = "canvas:missing".to_string();
    let shaders = ShaderRegistry::new("canvas:default");

    assert!(matches!(
        MaterialCache::with_config(&config, &shaders),
        Err(MaterialError::UnknownName { kind: "shader", .. })
    ));
}

#[test]
fn test_registries_feed_finder() {
    let config = MaterialConfig::default();
    let mut shaders = ShaderRegistry::new(&config.shaders.default_shader);
    let mut conditions = ConditionRegistry::new();
    let glow = shaders.register("canvas:glow").unwrap();
    let night = conditions.register("night").unwrap();

    let cache = MaterialCache::with_config(&config, &shaders).unwrap();
    assert_eq!(cache.default_shader(), ShaderIndex(0));

    let mut finder = MaterialFinder::new();
    finder
        .blend_mode(0, Some(BlendMode::Solid))
        .unwrap()
        .shader(glow)
        .unwrap()
        .condition(night)
        .unwrap();

    let state = finder.find(&cache);
    assert_eq!(shaders.name(state.shader()), Some("canvas:glow"));
    assert_eq!(conditions.name(state.condition()), Some("night"));
}

#[test]
fn test_standard_materials_with_configured_cache() {
    let shaders = ShaderRegistry::new("canvas:default");
    let cache = MaterialCache::with_config(&MaterialConfig::default(), &shaders).unwrap();
    let standard = StandardMaterials::new(&cache).unwrap();

    // Fallback materials inherit their blend mode from the render pass
    let solid = standard.select(false, true).for_blend_mode(BlendMode::Solid);
    assert_eq!(solid.blend_mode(0), BlendMode::Solid);
    assert!(solid.has_ao());
    assert!(!solid.disable_diffuse(0));
}
