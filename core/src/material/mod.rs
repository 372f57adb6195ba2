// ============================================================================
// Material Module
// ============================================================================
//
// Canonical material states: packed encoding, interning cache, and the
// blend-mode / depth variant graph built for every state.
//
// The module is organized into the following submodules:
// - layout: bit positions of every field in the packed register
// - attributes: typed record and its single encode/decode pair
// - flags: shader control flags and their WGSL constants
// - finder: reusable builder that resolves to canonical states
// - cache: deduplicating store, owns every state
// - state: immutable canonical state and its queries
// - variants: blend-mode and depth variant derivation
// - standard: fallback materials for quads without one
// - tests: behavior of the cache and the variant graph

mod attributes;
mod cache;
mod finder;
mod flags;
pub mod layout;
mod standard;
mod state;
mod variants;


pub use attributes::{LayerAttributes, MaterialAttributes, PackedMaterial};
pub use cache::MaterialCache;
pub use finder::MaterialFinder;
pub use flags::{SHADER_FLAGS_DISABLE_AO, ShaderFlags, shader_flag_constants_wgsl};
pub use layout::{MAX_CONDITIONS, MAX_SHADERS};
pub use standard::StandardMaterials;
pub use state::MaterialState;
