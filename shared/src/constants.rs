//! Centralized constants for the material system.
//!
//! Single source of truth for limits shared by the bit layout, the builder
//! and everything that indexes per-layer data.

/// Maximum number of stacked texture layers in one material.
///
/// Layer 0 is the base layer; layers 1 and 2 are overlays/decals.
pub const MAX_SPRITE_DEPTH: usize = 3;
