//! Typed material record and its packed form
//!
//! [`MaterialAttributes`] is the named-field view of a material;
//! [`PackedMaterial`] is the 64-bit register used as the cache key and read
//! by the shader. `encode`/`decode` are the only conversions between them.

use bytemuck::{Pod, Zeroable};
use canvas_shared::{BlendMode, ConditionIndex, MAX_SPRITE_DEPTH, ShaderIndex};
use serde::{Deserialize, Serialize};

use super::layout::{self, MAX_CONDITIONS, MAX_SHADERS};
use crate::error::MaterialError;

/// Attributes of one sprite layer.
///
/// `cutout` and `unmipped` are not stored here: they are implied by
/// `blend_mode` and written by [`MaterialAttributes::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerAttributes {
    pub blend_mode: BlendMode,
    pub emissive: bool,
    pub disable_diffuse: bool,
    pub disable_ao: bool,
    pub disable_color_index: bool,
}

/// Full attribute set of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialAttributes {
    /// Per-layer attributes; layers at or beyond `sprite_depth` are kept but inactive
    pub layers: [LayerAttributes; MAX_SPRITE_DEPTH],
    /// Number of active layers, 1..=MAX_SPRITE_DEPTH
    pub sprite_depth: usize,
    pub shader: ShaderIndex,
    pub condition: ConditionIndex,
}

impl Default for MaterialAttributes {
    fn default() -> Self {
        Self {
            layers: [LayerAttributes::default(); MAX_SPRITE_DEPTH],
            sprite_depth: 1,
            shader: ShaderIndex(0),
            condition: ConditionIndex(0),
        }
    }
}

impl MaterialAttributes {
    /// Active layers
    pub fn active_layers(&self) -> &[LayerAttributes] {
        &self.layers[..self.sprite_depth]
    }

    /// True if any active layer still inherits its blend mode from the render pass
    pub fn has_default_blend_mode(&self) -> bool {
        self.active_layers()
            .iter()
            .any(|layer| layer.blend_mode.is_default())
    }

    /// Check that `sprite_depth`, `shader` and `condition` fit the layout
    pub fn validate(&self) -> Result<(), MaterialError> {
        if !(1..=MAX_SPRITE_DEPTH).contains(&self.sprite_depth) {
            return Err(MaterialError::SpriteDepthOutOfRange {
                depth: self.sprite_depth,
            });
        }
        if self.shader.0 as usize >= MAX_SHADERS {
            return Err(MaterialError::ShaderOutOfRange {
                index: self.shader.0,
                max: MAX_SHADERS - 1,
            });
        }
        if self.condition.0 as usize >= MAX_CONDITIONS {
            return Err(MaterialError::ConditionOutOfRange {
                index: self.condition.0,
                max: MAX_CONDITIONS - 1,
            });
        }
        Ok(())
    }

    /// Pack into the 64-bit register.
    ///
    /// # Panics
    ///
    /// Panics if [`validate`](Self::validate) would fail. The builder
    /// validates before encoding.
    pub fn encode(&self) -> PackedMaterial {
        let mut bits = 0u64;

        for (i, layer) in self.layers.iter().enumerate() {
            bits = layout::EMISSIVE[i].set(bits, layer.emissive);
            bits = layout::DISABLE_DIFFUSE[i].set(bits, layer.disable_diffuse);
            bits = layout::DISABLE_AO[i].set(bits, layer.disable_ao);
            bits = layout::CUTOUT[i].set(bits, layer.blend_mode.is_cutout());
            bits = layout::UNMIPPED[i].set(bits, layer.blend_mode.is_unmipped());
            bits = layout::DISABLE_COLOR_INDEX[i].set(bits, layer.disable_color_index);
            bits = layout::BLEND_MODE[i].set(bits, layer.blend_mode);
        }

        bits = layout::SPRITE_DEPTH.set(bits, self.sprite_depth as u64);
        bits = layout::SHADER.set(bits, self.shader.0 as u64);
        bits = layout::CONDITION.set(bits, self.condition.0 as u64);

        PackedMaterial(bits)
    }
}

/// Packed 64-bit material register.
///
/// Plain old data so a slice of registers can be uploaded to the GPU as-is.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
pub struct PackedMaterial(u64);

impl PackedMaterial {
    /// Wrap raw register bits.
    ///
    /// Accessors panic on bits that were not produced by
    /// [`MaterialAttributes::encode`] (invalid blend-mode ordinals).
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn decode(self) -> MaterialAttributes {
        let mut layers = [LayerAttributes::default(); MAX_SPRITE_DEPTH];
        for (i, layer) in layers.iter_mut().enumerate() {
            *layer = LayerAttributes {
                blend_mode: self.blend_mode(i),
                emissive: self.emissive(i),
                disable_diffuse: self.disable_diffuse(i),
                disable_ao: self.disable_ao(i),
                disable_color_index: self.disable_color_index(i),
            };
        }

        MaterialAttributes {
            layers,
            sprite_depth: self.sprite_depth(),
            shader: self.shader(),
            condition: self.condition(),
        }
    }

    #[inline]
    pub fn blend_mode(self, layer: usize) -> BlendMode {
        layout::BLEND_MODE[layer].get(self.0)
    }

    #[inline]
    pub fn emissive(self, layer: usize) -> bool {
        layout::EMISSIVE[layer].get(self.0)
    }

    #[inline]
    pub fn disable_diffuse(self, layer: usize) -> bool {
        layout::DISABLE_DIFFUSE[layer].get(self.0)
    }

    #[inline]
    pub fn disable_ao(self, layer: usize) -> bool {
        layout::DISABLE_AO[layer].get(self.0)
    }

    #[inline]
    pub fn cutout(self, layer: usize) -> bool {
        layout::CUTOUT[layer].get(self.0)
    }

    #[inline]
    pub fn unmipped(self, layer: usize) -> bool {
        layout::UNMIPPED[layer].get(self.0)
    }

    #[inline]
    pub fn disable_color_index(self, layer: usize) -> bool {
        layout::DISABLE_COLOR_INDEX[layer].get(self.0)
    }

    #[inline]
    pub fn sprite_depth(self) -> usize {
        layout::SPRITE_DEPTH.get(self.0) as usize
    }

    #[inline]
    pub fn shader(self) -> ShaderIndex {
        ShaderIndex(layout::SHADER.get(self.0) as u32)
    }

    #[inline]
    pub fn condition(self) -> ConditionIndex {
        ConditionIndex(layout::CONDITION.get(self.0) as u32)
    }

    /// Low 16 bits, consumed by the shader as control flags
    #[inline]
    pub fn shader_flags(self) -> u16 {
        (self.0 & layout::SHADER_FLAGS_MASK) as u16
    }

    /// True if every layer's cutout/unmipped bits agree with its blend mode
    pub fn cutout_flags_consistent(self) -> bool {
        (0..MAX_SPRITE_DEPTH).all(|i| {
            let mode = self.blend_mode(i);
            self.cutout(i) == mode.is_cutout() && self.unmipped(i) == mode.is_unmipped()
        })
    }
}
