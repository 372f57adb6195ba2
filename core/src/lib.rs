//! Canvas Core - canonical material states
//!
//! This crate interns render materials: every distinct combination of
//! per-layer blend mode and shading flags, sprite depth, shader and
//! visibility condition maps to exactly one immutable [`MaterialState`],
//! so mesh building and batching can compare materials by identity.
//!
//! # Architecture
//!
//! - [`MaterialFinder`] - Reusable builder that resolves to a canonical state
//! - [`MaterialCache`] - Deduplicating store; derives blend-mode and depth
//!   variants once per state
//! - [`MaterialState`] - Immutable state with cached render properties
//! - [`ShaderRegistry`] / [`ConditionRegistry`] - Name to dense index maps
//! - [`StandardMaterials`] - Fallback materials for quads without one

pub mod config;
pub mod error;
#[cfg(test)]
mod integration;
pub mod material;
pub mod registry;
#[cfg(test)]
pub mod test_utils;
pub mod timer;

pub use config::MaterialConfig;
pub use error::MaterialError;
pub use material::{
    LayerAttributes, MAX_CONDITIONS, MAX_SHADERS, MaterialAttributes, MaterialCache,
    MaterialFinder, MaterialState, PackedMaterial, SHADER_FLAGS_DISABLE_AO, ShaderFlags,
    StandardMaterials, shader_flag_constants_wgsl,
};
pub use registry::{ALWAYS_CONDITION, ConditionRegistry, NamedRegistry, ShaderRegistry};
pub use timer::{MicroTimer, TimerReport};

// Re-export shared vocabulary for convenience
pub use canvas_shared::{
    BlendMode, ConditionIndex, MAX_SPRITE_DEPTH, MaterialIndex, PoolIndex, RenderLayer,
    ShaderIndex,
};
