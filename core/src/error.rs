//! Error types for material construction and configuration

use canvas_shared::MAX_SPRITE_DEPTH;
use thiserror::Error;

/// Errors returned for invalid caller input or unusable configuration.
///
/// Internal consistency violations are not represented here; those panic.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// Builder was given a layer index outside the sprite stack
    #[error("sprite layer {layer} is out of range (max {})", MAX_SPRITE_DEPTH - 1)]
    SpriteLayerOutOfRange { layer: usize },

    /// Builder was given a sprite depth outside `1..=MAX_SPRITE_DEPTH`
    #[error("sprite depth {depth} is out of range (1..={})", MAX_SPRITE_DEPTH)]
    SpriteDepthOutOfRange { depth: usize },

    /// `for_depth` was asked for a layer the state does not have
    #[error("depth variant {layer} requested from a material with sprite depth {depth}")]
    DepthVariantOutOfRange { layer: usize, depth: usize },

    /// Depth decomposition requested before the blend mode was resolved
    #[error("material {index} has unresolved default blend modes; resolve with for_blend_mode first")]
    UnresolvedBlendMode { index: u32 },

    #[error("shader index {index} exceeds the maximum of {max}")]
    ShaderOutOfRange { index: u32, max: usize },

    #[error("condition index {index} exceeds the maximum of {max}")]
    ConditionOutOfRange { index: u32, max: usize },

    /// Registry has handed out every index the bit layout can encode
    #[error("{kind} registry is full ({capacity} entries), cannot register '{name}'")]
    RegistryFull {
        kind: &'static str,
        capacity: usize,
        name: String,
    },

    #[error("no {kind} named '{name}' is registered")]
    UnknownName { kind: &'static str, name: String },

    #[error("failed to read material config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse material config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize material config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
