//! Material builder
//!
//! A `MaterialFinder` accumulates attributes and then resolves them to the
//! canonical state through a [`MaterialCache`]. It is cheap to create and
//! may be reused across lookups; it is not shared between threads.

use std::sync::Arc;

use canvas_shared::{BlendMode, ConditionIndex, MAX_SPRITE_DEPTH, ShaderIndex};

use super::attributes::{LayerAttributes, MaterialAttributes};
use super::cache::MaterialCache;
use super::layout::{MAX_CONDITIONS, MAX_SHADERS};
use super::state::MaterialState;
use crate::error::MaterialError;

#[derive(Debug, Clone, Default)]
pub struct MaterialFinder {
    attributes: MaterialAttributes,
    /// `None` selects the cache's default shader
    shader: Option<ShaderIndex>,
}

impl MaterialFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the default material: inherited blend modes, no flags,
    /// depth 1, default shader, condition 0
    pub fn clear(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    fn layer_mut(&mut self, layer: usize) -> Result<&mut LayerAttributes, MaterialError> {
        self.attributes
            .layers
            .get_mut(layer)
            .ok_or(MaterialError::SpriteLayerOutOfRange { layer })
    }

    /// Set the blend mode of `layer`; `None` inherits it from the render pass
    pub fn blend_mode(
        &mut self,
        layer: usize,
        mode: Option<BlendMode>,
    ) -> Result<&mut Self, MaterialError> {
        self.layer_mut(layer)?.blend_mode = mode.unwrap_or(BlendMode::Default);
        Ok(self)
    }

    pub fn emissive(&mut self, layer: usize, emissive: bool) -> Result<&mut Self, MaterialError> {
        self.layer_mut(layer)?.emissive = emissive;
        Ok(self)
    }

    pub fn disable_diffuse(
        &mut self,
        layer: usize,
        disable: bool,
    ) -> Result<&mut Self, MaterialError> {
        self.layer_mut(layer)?.disable_diffuse = disable;
        Ok(self)
    }

    pub fn disable_ao(&mut self, layer: usize, disable: bool) -> Result<&mut Self, MaterialError> {
        self.layer_mut(layer)?.disable_ao = disable;
        Ok(self)
    }

    pub fn disable_color_index(
        &mut self,
        layer: usize,
        disable: bool,
    ) -> Result<&mut Self, MaterialError> {
        self.layer_mut(layer)?.disable_color_index = disable;
        Ok(self)
    }

    /// Number of sprite layers, `1..=MAX_SPRITE_DEPTH`
    pub fn sprite_depth(&mut self, depth: usize) -> Result<&mut Self, MaterialError> {
        if !(1..=MAX_SPRITE_DEPTH).contains(&depth) {
            return Err(MaterialError::SpriteDepthOutOfRange { depth });
        }
        self.attributes.sprite_depth = depth;
        Ok(self)
    }

    pub fn shader(&mut self, shader: ShaderIndex) -> Result<&mut Self, MaterialError> {
        if shader.0 as usize >= MAX_SHADERS {
            return Err(MaterialError::ShaderOutOfRange {
                index: shader.0,
                max: MAX_SHADERS - 1,
            });
        }
        self.shader = Some(shader);
        Ok(self)
    }

    pub fn condition(&mut self, condition: ConditionIndex) -> Result<&mut Self, MaterialError> {
        if condition.0 as usize >= MAX_CONDITIONS {
            return Err(MaterialError::ConditionOutOfRange {
                index: condition.0,
                max: MAX_CONDITIONS - 1,
            });
        }
        self.attributes.condition = condition;
        Ok(self)
    }

    /// Replace the pending layers, sprite depth and condition with those of
    /// `attributes`, e.g. a record read from TOML.
    ///
    /// The shader selection is left as is: a record that never named a
    /// shader still resolves to the cache's default. Invalid records are
    /// rejected and leave the finder unchanged.
    pub fn set_attributes(
        &mut self,
        attributes: &MaterialAttributes,
    ) -> Result<&mut Self, MaterialError> {
        attributes.validate()?;
        self.attributes = MaterialAttributes {
            shader: self.attributes.shader,
            ..*attributes
        };
        Ok(self)
    }

    /// Pending attributes. The shader is applied by [`find`](Self::find).
    pub fn attributes(&self) -> &MaterialAttributes {
        &self.attributes
    }

    /// Look up or create the canonical state for the pending attributes.
    ///
    /// The finder itself is left unchanged.
    pub fn find(&self, cache: &MaterialCache) -> Arc<MaterialState> {
        let mut attributes = self.attributes;
        attributes.shader = self.shader.unwrap_or_else(|| cache.default_shader());
        cache.resolve(&attributes)
    }
}
