//! Canonical material state

use std::fmt;
use std::sync::{Arc, OnceLock};

use canvas_shared::{BlendMode, ConditionIndex, MaterialIndex, RenderLayer, ShaderIndex};

use super::attributes::{MaterialAttributes, PackedMaterial};
use crate::error::MaterialError;

/// A variant slot: the state itself, or another state of the same cache.
///
/// Self slots are not stored as `Arc` so the variant graph has no cycles.
#[derive(Debug)]
pub(crate) enum VariantRef {
    This,
    Other(Arc<MaterialState>),
}

/// Companion states computed once after creation
#[derive(Debug)]
pub(crate) enum Variants {
    /// Some active layer inherits its blend mode; one resolved state per
    /// concrete mode, in [`BlendMode::CONCRETE`] order.
    Unresolved { blend: [Arc<MaterialState>; 4] },
    /// Every active layer has a concrete blend mode. All blend variants are
    /// the state itself; `depth[i]` renders layer `i` alone.
    Resolved { depth: Vec<VariantRef> },
}

/// Immutable, interned material.
///
/// One instance exists per distinct packed pattern within a
/// [`MaterialCache`](super::MaterialCache), so states can be compared with
/// [`Arc::ptr_eq`] or by [`index`](Self::index).
pub struct MaterialState {
    index: MaterialIndex,
    packed: PackedMaterial,

    has_ao: bool,
    emissive_flags: u8,
    render_layer: RenderLayer,
    is_cutout: bool,
    is_translucent: bool,

    variants: OnceLock<Variants>,
}

impl MaterialState {
    pub(crate) fn new(index: MaterialIndex, packed: PackedMaterial) -> Self {
        let depth = packed.sprite_depth();

        let has_ao = (0..depth).any(|layer| !packed.disable_ao(layer));

        let emissive_flags = (0..canvas_shared::MAX_SPRITE_DEPTH)
            .filter(|&layer| packed.emissive(layer))
            .fold(0u8, |flags, layer| flags | (1 << layer));

        let (is_translucent, is_cutout) = if packed.blend_mode(0) == BlendMode::Solid {
            // Other layers render as decals in the solid pass
            (false, false)
        } else {
            let translucent =
                (0..depth).any(|layer| packed.blend_mode(layer) == BlendMode::Translucent);
            (translucent, !translucent)
        };

        let render_layer = if is_translucent {
            RenderLayer::Translucent
        } else {
            RenderLayer::Solid
        };

        Self {
            index,
            packed,
            has_ao,
            emissive_flags,
            render_layer,
            is_cutout,
            is_translucent,
            variants: OnceLock::new(),
        }
    }

    pub(crate) fn set_variants(&self, variants: Variants) {
        if self.variants.set(variants).is_err() {
            panic!("variants of material {} derived twice", self.index);
        }
    }

    #[cfg(test)]
    pub(crate) fn has_variants(&self) -> bool {
        self.variants.get().is_some()
    }

    fn variants(&self) -> &Variants {
        match self.variants.get() {
            Some(variants) => variants,
            None => panic!("material {} used before its variants were derived", self.index),
        }
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    /// Dense creation-order identity, unique within the owning cache
    #[inline]
    pub fn index(&self) -> MaterialIndex {
        self.index
    }

    #[inline]
    pub fn packed(&self) -> PackedMaterial {
        self.packed
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.packed.bits()
    }

    pub fn attributes(&self) -> MaterialAttributes {
        self.packed.decode()
    }

    // ------------------------------------------------------------------------
    // Attribute queries (layer must be < MAX_SPRITE_DEPTH)
    // ------------------------------------------------------------------------

    #[inline]
    pub fn blend_mode(&self, layer: usize) -> BlendMode {
        self.packed.blend_mode(layer)
    }

    #[inline]
    pub fn emissive(&self, layer: usize) -> bool {
        self.packed.emissive(layer)
    }

    #[inline]
    pub fn disable_diffuse(&self, layer: usize) -> bool {
        self.packed.disable_diffuse(layer)
    }

    #[inline]
    pub fn disable_ao(&self, layer: usize) -> bool {
        self.packed.disable_ao(layer)
    }

    #[inline]
    pub fn disable_color_index(&self, layer: usize) -> bool {
        self.packed.disable_color_index(layer)
    }

    #[inline]
    pub fn cutout(&self, layer: usize) -> bool {
        self.packed.cutout(layer)
    }

    #[inline]
    pub fn unmipped(&self, layer: usize) -> bool {
        self.packed.unmipped(layer)
    }

    #[inline]
    pub fn sprite_depth(&self) -> usize {
        self.packed.sprite_depth()
    }

    #[inline]
    pub fn shader(&self) -> ShaderIndex {
        self.packed.shader()
    }

    #[inline]
    pub fn condition(&self) -> ConditionIndex {
        self.packed.condition()
    }

    /// Low 16 bits of the register, uploaded to the shader
    #[inline]
    pub fn shader_flags(&self) -> u16 {
        self.packed.shader_flags()
    }

    // ------------------------------------------------------------------------
    // Derived properties
    // ------------------------------------------------------------------------

    /// True if any active layer receives ambient occlusion
    #[inline]
    pub fn has_ao(&self) -> bool {
        self.has_ao
    }

    /// Emissive bits of layers 0..3 as bits 0..3
    #[inline]
    pub fn emissive_flags(&self) -> u8 {
        self.emissive_flags
    }

    /// Buffer this material renders into
    #[inline]
    pub fn render_layer(&self) -> RenderLayer {
        self.render_layer
    }

    #[inline]
    pub fn is_cutout(&self) -> bool {
        self.is_cutout
    }

    #[inline]
    pub fn is_translucent(&self) -> bool {
        self.is_translucent
    }

    /// True if an active layer still inherits its blend mode
    pub fn has_default_blend_mode(&self) -> bool {
        (0..self.sprite_depth()).any(|layer| self.blend_mode(layer).is_default())
    }

    // ------------------------------------------------------------------------
    // Variants
    // ------------------------------------------------------------------------

    /// This material with every inherited blend mode set to `mode`.
    ///
    /// Returns `self` when the material has no inherited blend modes.
    ///
    /// # Panics
    ///
    /// Panics if `mode` is [`BlendMode::Default`].
    pub fn for_blend_mode(&self, mode: BlendMode) -> &MaterialState {
        let Some(slot) = mode.concrete_position() else {
            panic!("material {}: cannot resolve to the DEFAULT blend mode", self.index);
        };

        match self.variants() {
            Variants::Unresolved { blend } => &blend[slot],
            Variants::Resolved { .. } => self,
        }
    }

    /// Single-layer material that renders sprite layer `layer` of this one.
    ///
    /// Layer 0 keeps its own blend mode; overlay layers render translucent.
    /// A single-layer material returns itself for layer 0.
    pub fn for_depth(&self, layer: usize) -> Result<&MaterialState, MaterialError> {
        let depth = self.sprite_depth();
        if layer >= depth {
            return Err(MaterialError::DepthVariantOutOfRange { layer, depth });
        }

        match self.variants() {
            Variants::Unresolved { .. } => Err(MaterialError::UnresolvedBlendMode {
                index: self.index.0,
            }),
            Variants::Resolved { depth: slots } => match &slots[layer] {
                VariantRef::This => Ok(self),
                VariantRef::Other(state) => Ok(state),
            },
        }
    }
}

impl PartialEq for MaterialState {
    fn eq(&self, other: &Self) -> bool {
        self.packed == other.packed
    }
}

impl Eq for MaterialState {}

impl fmt::Debug for MaterialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Variants are omitted; they are other states of the same cache
        f.debug_struct("MaterialState")
            .field("index", &self.index)
            .field("bits", &format_args!("{:#014x}", self.packed.bits()))
            .field("sprite_depth", &self.sprite_depth())
            .field("render_layer", &self.render_layer)
            .field("shader", &self.shader())
            .field("condition", &self.condition())
            .finish()
    }
}
