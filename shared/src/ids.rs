//! Typed dense indices.
//!
//! Materials, shaders and conditions are all identified by small dense
//! integers handed out in registration/creation order. Newtypes keep the
//! three index spaces from being mixed up.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Trait for type-safe pool indices
///
/// Implement this for newtype wrappers around u32 to enable type-safe
/// pool access. The trait provides conversion to/from raw u32.
pub trait PoolIndex: Copy + Clone + PartialEq + Eq + Hash + fmt::Debug {
    /// Create index from raw u32
    fn from_raw(value: u32) -> Self;

    /// Get raw u32 value
    fn as_raw(&self) -> u32;
}

macro_rules! pool_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl PoolIndex for $name {
            fn from_raw(value: u32) -> Self {
                $name(value)
            }

            fn as_raw(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pool_index!(
    /// Identity of a canonical material state, dense from 0 in creation order
    MaterialIndex
);

pool_index!(
    /// Index of a registered shader program
    ShaderIndex
);

pool_index!(
    /// Index of a registered visibility condition
    ConditionIndex
);

impl MaterialIndex {
    /// Index usable as an array offset
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_index_round_trip() {
        assert_eq!(MaterialIndex::from_raw(7).as_raw(), 7);
        assert_eq!(ShaderIndex::from_raw(0), ShaderIndex(0));
        assert_eq!(ConditionIndex::default(), ConditionIndex(0));
    }

    #[test]
    fn test_material_index_display() {
        assert_eq!(MaterialIndex(42).to_string(), "42");
        assert_eq!(MaterialIndex(3).as_usize(), 3);
    }
}
