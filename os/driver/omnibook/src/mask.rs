/// A read-modify-write step on one register byte.
///
/// Legacy tables encode this as a signed byte: positive values OR their bits
/// in, negative values clear the bits of their magnitude. `MaskOp` keeps the
/// direction explicit instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskOp {
    /// `value | bits`
    Set(u8),
    /// `value & !bits`
    Clear(u8),
}

impl MaskOp {
    /// Decodes a legacy signed mask; `0` and `-128` carry no usable bits.
    #[must_use]
    pub const fn from_signed(mask: i8) -> Option<Self> {
        match mask {
            0 | i8::MIN => None,
            1..=i8::MAX => Some(Self::Set(mask.unsigned_abs())),
            _ => Some(Self::Clear(mask.unsigned_abs())),
        }
    }

    /// The legacy signed encoding, if the bits fit into one.
    #[must_use]
    pub const fn to_signed(self) -> Option<i8> {
        match self {
            Self::Set(bits) if bits <= 0x7f => Some(bits.cast_signed()),
            Self::Clear(bits) if bits <= 0x7f => Some(-bits.cast_signed()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Set(bits) | Self::Clear(bits) => bits,
        }
    }

    #[must_use]
    pub const fn apply(self, value: u8) -> u8 {
        match self {
            Self::Set(bits) => value | bits,
            Self::Clear(bits) => value & !bits,
        }
    }

    /// `true` if the step would change at least one bit.
    #[must_use]
    pub const fn is_effective(self) -> bool {
        self.bits() != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signed_masks_decode() {
        assert_eq!(MaskOp::from_signed(0x20), Some(MaskOp::Set(0x20)));
        assert_eq!(MaskOp::from_signed(-0x20), Some(MaskOp::Clear(0x20)));
        assert_eq!(MaskOp::from_signed(0), None);
        assert_eq!(MaskOp::from_signed(i8::MIN), None);
    }

    #[test]
    fn apply_sets_or_clears() {
        assert_eq!(MaskOp::Set(0x20).apply(0x01), 0x21);
        assert_eq!(MaskOp::Clear(0x20).apply(0x21), 0x01);
        assert_eq!(MaskOp::Clear(0x0a).apply(0xff), 0xf5);
    }

    #[test]
    fn signed_encoding_is_restored() {
        for raw in (i8::MIN + 1)..=i8::MAX {
            if let Some(op) = MaskOp::from_signed(raw) {
                assert_eq!(op.to_signed(), Some(raw));
            }
        }
        assert_eq!(MaskOp::Set(0x80).to_signed(), None);
    }
}
