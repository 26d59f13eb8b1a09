//! Identifiers for cached object families.

use serde::{Deserialize, Serialize};

/// Stable identity of an object across frames.
///
/// Plain ids come straight from the host. Packed ids fold a slot index into the
/// high bits so one family key can address a single instance; masking with
/// [`FamilyId::ID_MASK`] recovers the object id for bulk clearing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FamilyId(pub u32);

impl FamilyId {
    /// Bits reserved for the object id in a packed key.
    pub const ID_BITS: u32 = 14;
    pub const ID_MASK: u32 = (1 << Self::ID_BITS) - 1;
    /// Bits available for the index in a packed key.
    pub const INDEX_MASK: u32 = 0x3FFFF;

    /// Pack `index` into the high bits and `id` into the low bits.
    #[inline]
    pub const fn packed(id: u32, index: u32) -> Self {
        FamilyId(((index & Self::INDEX_MASK) << Self::ID_BITS) | (id & Self::ID_MASK))
    }

    #[inline]
    pub const fn object_id(self) -> u32 {
        self.0 & Self::ID_MASK
    }

    #[inline]
    pub const fn packed_index(self) -> u32 {
        self.0 >> Self::ID_BITS
    }

    /// `true` when `(id & mask) == matched`.
    #[inline]
    pub const fn matches(self, mask: u32, matched: u32) -> bool {
        self.0 & mask == matched
    }
}

impl From<u32> for FamilyId {
    fn from(v: u32) -> Self {
        FamilyId(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_roundtrip() {
        let k = FamilyId::packed(42, 7);
        assert_eq!(k.object_id(), 42);
        assert_eq!(k.packed_index(), 7);
        assert!(k.matches(FamilyId::ID_MASK, 42));
        assert!(!k.matches(FamilyId::ID_MASK, 43));
    }

    #[test]
    fn packed_truncates_out_of_range_parts() {
        let k = FamilyId::packed(FamilyId::ID_MASK + 5, 0);
        assert_eq!(k.object_id(), 4);
        assert_eq!(k.packed_index(), 0);
    }
}
