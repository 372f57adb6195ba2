//! Blend mode and render layer vocabulary
//!
//! Blend modes are stored per sprite layer in the packed material register,
//! so their ordinals are part of the bit layout and must not be reordered.

use serde::{Deserialize, Serialize};

/// Blend mode of a single sprite layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlendMode {
    /// Inherit from the render pass; resolved to a concrete mode when needed
    #[default]
    Default = 0,
    /// Opaque
    Solid = 1,
    /// Alpha-tested, not mipmapped
    Cutout = 2,
    /// Alpha-tested, mipmapped
    CutoutMipped = 3,
    /// Alpha-blended
    Translucent = 4,
}

impl BlendMode {
    /// Number of blend modes, including `Default`
    pub const COUNT: usize = 5;

    /// Concrete (non-default) modes in their declared order.
    ///
    /// Position in this array is the variant slot used by blend-mode
    /// resolution, i.e. `ordinal - 1`.
    pub const CONCRETE: [BlendMode; 4] = [
        BlendMode::Solid,
        BlendMode::Cutout,
        BlendMode::CutoutMipped,
        BlendMode::Translucent,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(BlendMode::Default),
            1 => Some(BlendMode::Solid),
            2 => Some(BlendMode::Cutout),
            3 => Some(BlendMode::CutoutMipped),
            4 => Some(BlendMode::Translucent),
            _ => None,
        }
    }

    /// Ordinal as stored in the packed register
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_default(self) -> bool {
        matches!(self, BlendMode::Default)
    }

    /// Slot of this mode in [`BlendMode::CONCRETE`], `None` for `Default`
    #[inline]
    pub const fn concrete_position(self) -> Option<usize> {
        match self {
            BlendMode::Default => None,
            mode => Some(mode as usize - 1),
        }
    }

    /// Whether the mode is alpha-tested (`cutout` flag set in the register)
    #[inline]
    pub const fn is_cutout(self) -> bool {
        matches!(self, BlendMode::Cutout | BlendMode::CutoutMipped)
    }

    /// Whether the mode samples without mipmaps (`unmipped` flag set in the register)
    #[inline]
    pub const fn is_unmipped(self) -> bool {
        matches!(self, BlendMode::Cutout)
    }
}

/// Buffer a material renders into.
///
/// Derived from the base layer: a solid base renders every other layer as a
/// decal in the solid pass, otherwise any translucent layer moves the whole
/// material to the translucent pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderLayer {
    Solid,
    Translucent,
}

impl RenderLayer {
    /// The blend mode this layer corresponds to
    pub const fn blend_mode(self) -> BlendMode {
        match self {
            RenderLayer::Solid => BlendMode::Solid,
            RenderLayer::Translucent => BlendMode::Translucent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_mode_conversion() {
        assert_eq!(BlendMode::from_u8(0), Some(BlendMode::Default));
        assert_eq!(BlendMode::from_u8(1), Some(BlendMode::Solid));
        assert_eq!(BlendMode::from_u8(2), Some(BlendMode::Cutout));
        assert_eq!(BlendMode::from_u8(3), Some(BlendMode::CutoutMipped));
        assert_eq!(BlendMode::from_u8(4), Some(BlendMode::Translucent));
        assert_eq!(BlendMode::from_u8(5), None);
        assert_eq!(BlendMode::from_u8(99), None);
    }

    #[test]
    fn test_concrete_positions_follow_declared_order() {
        assert_eq!(BlendMode::Default.concrete_position(), None);
        for (i, mode) in BlendMode::CONCRETE.iter().enumerate() {
            assert_eq!(mode.concrete_position(), Some(i));
            assert!(!mode.is_default());
        }
    }

    #[test]
    fn test_cutout_flags_implied_by_mode() {
        assert!(BlendMode::Cutout.is_cutout());
        assert!(BlendMode::Cutout.is_unmipped());
        assert!(BlendMode::CutoutMipped.is_cutout());
        assert!(!BlendMode::CutoutMipped.is_unmipped());

        for mode in [BlendMode::Default, BlendMode::Solid, BlendMode::Translucent] {
            assert!(!mode.is_cutout(), "{:?}", mode);
            assert!(!mode.is_unmipped(), "{:?}", mode);
        }
    }

    #[test]
    fn test_render_layer_blend_mode() {
        assert_eq!(RenderLayer::Solid.blend_mode(), BlendMode::Solid);
        assert_eq!(RenderLayer::Translucent.blend_mode(), BlendMode::Translucent);
    }
}
