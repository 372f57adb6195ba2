//! Shared types for the Canvas material system.
//!
//! Vocabulary used both by the material-state engine in `canvas-core` and by
//! the code that consumes canonical states (mesh building, buffer routing).

pub mod blend;
pub mod constants;
pub mod ids;

pub use blend::{BlendMode, RenderLayer};
pub use constants::MAX_SPRITE_DEPTH;
pub use ids::{ConditionIndex, MaterialIndex, PoolIndex, ShaderIndex};
