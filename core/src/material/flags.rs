//! Shader control flags
//!
//! The low 16 bits of the packed register are uploaded as-is and tested by
//! the GPU shader. Bit values come from the layout descriptors so the two
//! sides cannot drift.

use std::fmt::Write as _;

use bitflags::{Flags, bitflags};

use super::layout;

const fn flag(field: layout::BoolField) -> u16 {
    field.mask() as u16
}

bitflags! {
    /// Control bits read by the shader
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderFlags: u16 {
        const EMISSIVE_0 = flag(layout::EMISSIVE[0]);
        const EMISSIVE_1 = flag(layout::EMISSIVE[1]);
        const EMISSIVE_2 = flag(layout::EMISSIVE[2]);

        const DISABLE_DIFFUSE_0 = flag(layout::DISABLE_DIFFUSE[0]);
        const DISABLE_AO_0 = flag(layout::DISABLE_AO[0]);
        const CUTOUT_0 = flag(layout::CUTOUT[0]);
        const UNMIPPED_0 = flag(layout::UNMIPPED[0]);

        const DISABLE_DIFFUSE_1 = flag(layout::DISABLE_DIFFUSE[1]);
        const DISABLE_AO_1 = flag(layout::DISABLE_AO[1]);
        const CUTOUT_1 = flag(layout::CUTOUT[1]);
        const UNMIPPED_1 = flag(layout::UNMIPPED[1]);

        const DISABLE_DIFFUSE_2 = flag(layout::DISABLE_DIFFUSE[2]);
        const DISABLE_AO_2 = flag(layout::DISABLE_AO[2]);
        const CUTOUT_2 = flag(layout::CUTOUT[2]);
        const UNMIPPED_2 = flag(layout::UNMIPPED[2]);

        /// AO disabled on every layer
        const DISABLE_AO = Self::DISABLE_AO_0.bits()
            | Self::DISABLE_AO_1.bits()
            | Self::DISABLE_AO_2.bits();
    }
}

/// AO-disable bits of all layers, as a raw mask
pub const SHADER_FLAGS_DISABLE_AO: u16 = ShaderFlags::DISABLE_AO.bits();

/// WGSL constant declarations for every single control bit.
///
/// Composite masks are skipped; shaders test one bit at a time.
pub fn shader_flag_constants_wgsl() -> String {
    let mut out = String::from("// Material control flags (generated)\n");
    for flag in <ShaderFlags as Flags>::FLAGS {
        let bits = flag.value().bits();
        if bits.count_ones() != 1 {
            continue;
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "const FLAG_{}: u32 = 0x{:04x}u;", flag.name(), bits);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_cover_low_sixteen_bits_except_padding() {
        let all = ShaderFlags::all().bits();
        assert_eq!(all, 0xFFFF & !(1 << 3));
    }

    #[test]
    fn test_disable_ao_mask() {
        assert_eq!(SHADER_FLAGS_DISABLE_AO, (1 << 5) | (1 << 9) | (1 << 13));
    }

    #[test]
    fn test_wgsl_constants() {
        let wgsl = shader_flag_constants_wgsl();
        assert!(wgsl.contains("const FLAG_EMISSIVE_0: u32 = 0x0001u;"));
        assert!(wgsl.contains("const FLAG_DISABLE_DIFFUSE_0: u32 = 0x0010u;"));
        assert!(wgsl.contains("const FLAG_UNMIPPED_2: u32 = 0x8000u;"));
        // Composite masks are not emitted
        assert!(!wgsl.contains("FLAG_DISABLE_AO:"));
        assert_eq!(wgsl.lines().filter(|l| l.starts_with("const")).count(), 15);
    }
}
