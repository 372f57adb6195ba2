//! Bit layout of the packed material register
//!
//! Every logical material attribute owns a fixed bit range inside one `u64`.
//! This module is the only place those ranges are declared; everything else
//! goes through the field descriptors below or the typed record in
//! `attributes`.
//!
//! The low 16 bits are read directly by the GPU shader as control flags:
//!
//! | Bits  | Field                                                  |
//! |-------|--------------------------------------------------------|
//! | 0-2   | emissive, layers 0-2                                   |
//! | 3     | reserved (always 0)                                    |
//! | 4-7   | layer 0: disable diffuse, disable AO, cutout, unmipped |
//! | 8-11  | layer 1: same group                                    |
//! | 12-15 | layer 2: same group                                    |
//!
//! The remaining fields are CPU-side only:
//!
//! | Bits  | Field                                  |
//! |-------|----------------------------------------|
//! | 16-18 | disable color index, layers 0-2        |
//! | 19-27 | blend mode ordinal, 3 bits per layer   |
//! | 28-29 | sprite depth - 1                       |
//! | 30-41 | shader index                           |
//! | 42-47 | condition index                        |

use std::marker::PhantomData;

use canvas_shared::{BlendMode, MAX_SPRITE_DEPTH};

/// Number of shader programs addressable by the layout
pub const MAX_SHADERS: usize = 4096;

/// Number of visibility conditions addressable by the layout
pub const MAX_CONDITIONS: usize = 64;

/// Bits shared with the GPU shader as control flags
pub const SHADER_FLAGS_MASK: u64 = 0xFFFF;

/// Minimum number of bits able to hold `count` distinct values
const fn bits_for(count: u64) -> u32 {
    if count <= 1 {
        0
    } else {
        64 - (count - 1).leading_zeros()
    }
}

const fn mask_of(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

// ============================================================================
// Field descriptors
// ============================================================================

/// Single-bit boolean field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolField {
    bit: u32,
}

impl BoolField {
    pub const fn at(bit: u32) -> Self {
        Self { bit }
    }

    pub const fn bit(self) -> u32 {
        self.bit
    }

    pub const fn mask(self) -> u64 {
        1u64 << self.bit
    }

    pub const fn end(self) -> u32 {
        self.bit + 1
    }

    #[inline]
    pub const fn get(self, bits: u64) -> bool {
        bits & self.mask() != 0
    }

    #[inline]
    pub const fn set(self, bits: u64, value: bool) -> u64 {
        if value {
            bits | self.mask()
        } else {
            bits & !self.mask()
        }
    }
}

/// Enum that can be stored by ordinal in an [`EnumField`]
pub trait PackedEnum: Copy + std::fmt::Debug {
    /// Number of distinct values
    const COUNT: u64;

    fn ordinal(self) -> u64;

    fn from_ordinal(ordinal: u64) -> Option<Self>;
}

impl PackedEnum for BlendMode {
    const COUNT: u64 = BlendMode::COUNT as u64;

    fn ordinal(self) -> u64 {
        BlendMode::ordinal(self) as u64
    }

    fn from_ordinal(ordinal: u64) -> Option<Self> {
        u8::try_from(ordinal).ok().and_then(BlendMode::from_u8)
    }
}

/// Enum field stored as its ordinal in the minimum number of bits
#[derive(Debug)]
pub struct EnumField<E> {
    shift: u32,
    width: u32,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Clone for EnumField<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnumField<E> {}

impl<E: PackedEnum> EnumField<E> {
    pub const fn new(shift: u32) -> Self {
        Self {
            shift,
            width: bits_for(E::COUNT),
            _marker: PhantomData,
        }
    }

    pub const fn shift(self) -> u32 {
        self.shift
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    pub const fn end(self) -> u32 {
        self.shift + self.width
    }

    #[inline]
    pub fn get(self, bits: u64) -> E {
        let ordinal = (bits >> self.shift) & mask_of(self.width);
        match E::from_ordinal(ordinal) {
            Some(value) => value,
            None => panic!(
                "corrupt material bits {:#018x}: ordinal {} at bit {} is not a valid {}",
                bits,
                ordinal,
                self.shift,
                std::any::type_name::<E>()
            ),
        }
    }

    #[inline]
    pub fn set(self, bits: u64, value: E) -> u64 {
        let mask = mask_of(self.width) << self.shift;
        (bits & !mask) | ((value.ordinal() << self.shift) & mask)
    }
}

/// Integer field holding a value in `min..=max`, stored as `value - min`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntField {
    shift: u32,
    width: u32,
    min: u64,
    max: u64,
}

impl IntField {
    pub const fn new(shift: u32, min: u64, max: u64) -> Self {
        assert!(min <= max, "integer field with empty range");
        Self {
            shift,
            width: bits_for(max - min + 1),
            min,
            max,
        }
    }

    pub const fn min(self) -> u64 {
        self.min
    }

    pub const fn max(self) -> u64 {
        self.max
    }

    pub const fn shift(self) -> u32 {
        self.shift
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    pub const fn end(self) -> u32 {
        self.shift + self.width
    }

    #[inline]
    pub const fn get(self, bits: u64) -> u64 {
        ((bits >> self.shift) & mask_of(self.width)) + self.min
    }

    /// Store `value` in the field.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `min..=max`. Callers validate user input
    /// before it reaches the layout; a failure here means the static layout
    /// does not fit the declared cardinalities.
    #[inline]
    pub const fn set(self, bits: u64, value: u64) -> u64 {
        assert!(
            value >= self.min && value <= self.max,
            "value out of range for material bit field"
        );
        let mask = mask_of(self.width) << self.shift;
        (bits & !mask) | (((value - self.min) << self.shift) & mask)
    }
}

// ============================================================================
// Material register layout
// ============================================================================

const fn layer_group(layer: u32, offset: u32) -> BoolField {
    BoolField::at(4 + layer * 4 + offset)
}

pub const EMISSIVE: [BoolField; MAX_SPRITE_DEPTH] =
    [BoolField::at(0), BoolField::at(1), BoolField::at(2)];

/// Padding so the per-layer groups start on a nibble boundary
pub const RESERVED: BoolField = BoolField::at(3);

pub const DISABLE_DIFFUSE: [BoolField; MAX_SPRITE_DEPTH] =
    [layer_group(0, 0), layer_group(1, 0), layer_group(2, 0)];

pub const DISABLE_AO: [BoolField; MAX_SPRITE_DEPTH] =
    [layer_group(0, 1), layer_group(1, 1), layer_group(2, 1)];

pub const CUTOUT: [BoolField; MAX_SPRITE_DEPTH] =
    [layer_group(0, 2), layer_group(1, 2), layer_group(2, 2)];

pub const UNMIPPED: [BoolField; MAX_SPRITE_DEPTH] =
    [layer_group(0, 3), layer_group(1, 3), layer_group(2, 3)];

const COLOR_INDEX_START: u32 = UNMIPPED[MAX_SPRITE_DEPTH - 1].end();

pub const DISABLE_COLOR_INDEX: [BoolField; MAX_SPRITE_DEPTH] = [
    BoolField::at(COLOR_INDEX_START),
    BoolField::at(COLOR_INDEX_START + 1),
    BoolField::at(COLOR_INDEX_START + 2),
];

const BLEND_MODE_START: u32 = DISABLE_COLOR_INDEX[MAX_SPRITE_DEPTH - 1].end();
const BLEND_MODE_WIDTH: u32 = bits_for(BlendMode::COUNT as u64);

pub const BLEND_MODE: [EnumField<BlendMode>; MAX_SPRITE_DEPTH] = [
    EnumField::new(BLEND_MODE_START),
    EnumField::new(BLEND_MODE_START + BLEND_MODE_WIDTH),
    EnumField::new(BLEND_MODE_START + BLEND_MODE_WIDTH * 2),
];

pub const SPRITE_DEPTH: IntField = IntField::new(
    BLEND_MODE[MAX_SPRITE_DEPTH - 1].end(),
    1,
    MAX_SPRITE_DEPTH as u64,
);

pub const SHADER: IntField = IntField::new(SPRITE_DEPTH.end(), 0, MAX_SHADERS as u64 - 1);

pub const CONDITION: IntField = IntField::new(SHADER.end(), 0, MAX_CONDITIONS as u64 - 1);

/// Total number of bits used by the layout
pub const BIT_LENGTH: u32 = CONDITION.end();

const _: () = assert!(BIT_LENGTH <= 64, "material bit layout exceeds 64 bits");
const _: () = assert!(
    UNMIPPED[MAX_SPRITE_DEPTH - 1].end() == 16,
    "shader control flags must occupy exactly the low 16 bits"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_control_bit_positions() {
        assert_eq!(EMISSIVE.map(BoolField::bit), [0, 1, 2]);
        assert_eq!(RESERVED.bit(), 3);
        assert_eq!(DISABLE_DIFFUSE.map(BoolField::bit), [4, 8, 12]);
        assert_eq!(DISABLE_AO.map(BoolField::bit), [5, 9, 13]);
        assert_eq!(CUTOUT.map(BoolField::bit), [6, 10, 14]);
        assert_eq!(UNMIPPED.map(BoolField::bit), [7, 11, 15]);
    }

    #[test]
    fn test_cpu_side_field_positions() {
        assert_eq!(DISABLE_COLOR_INDEX.map(BoolField::bit), [16, 17, 18]);
        assert_eq!(BLEND_MODE.map(|f| f.shift()), [19, 22, 25]);
        assert!(BLEND_MODE.iter().all(|f| f.width() == 3));
        assert_eq!(SPRITE_DEPTH.shift(), 28);
        assert_eq!(SPRITE_DEPTH.width(), 2);
        assert_eq!(SHADER.shift(), 30);
        assert_eq!(SHADER.width(), 12);
        assert_eq!(CONDITION.shift(), 42);
        assert_eq!(CONDITION.width(), 6);
        assert_eq!(BIT_LENGTH, 48);
    }

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(1), 0);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(5), 3);
        assert_eq!(bits_for(4096), 12);
        assert_eq!(bits_for(4097), 13);
    }

    #[test]
    fn test_bool_field_set_get() {
        let field = BoolField::at(9);
        let bits = field.set(0, true);
        assert_eq!(bits, 1 << 9);
        assert!(field.get(bits));
        assert!(!field.get(field.set(bits, false)));
    }

    #[test]
    fn test_enum_field_leaves_neighbors_untouched() {
        let bits = BLEND_MODE[0].set(u64::MAX, BlendMode::Solid);
        assert_eq!(BLEND_MODE[0].get(bits), BlendMode::Solid);
        // Bits on either side of the field are still set
        assert!(DISABLE_COLOR_INDEX[2].get(bits));
        assert_eq!((bits >> BLEND_MODE[1].shift()) & 0b111, 0b111);
    }

    #[test]
    fn test_int_field_offsets_by_min() {
        let bits = SPRITE_DEPTH.set(0, 1);
        assert_eq!(bits, 0, "depth 1 is stored as zero");
        assert_eq!(SPRITE_DEPTH.get(0), 1);
        assert_eq!(SPRITE_DEPTH.get(SPRITE_DEPTH.set(0, 3)), 3);

        let bits = SHADER.set(0, MAX_SHADERS as u64 - 1);
        assert_eq!(SHADER.get(bits), MAX_SHADERS as u64 - 1);
        assert_eq!(CONDITION.get(bits), 0);
    }

    #[test]
    #[should_panic(expected = "value out of range")]
    fn test_int_field_rejects_out_of_range() {
        SPRITE_DEPTH.set(0, 4);
    }

    #[test]
    #[should_panic(expected = "corrupt material bits")]
    fn test_enum_field_rejects_invalid_ordinal() {
        BLEND_MODE[0].get(0b111 << BLEND_MODE[0].shift());
    }
}
