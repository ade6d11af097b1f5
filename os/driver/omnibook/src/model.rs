use bitflags::bitflags;

bitflags! {
    /// Laptop families; a table entry lists every family it applies to.
    ///
    /// A running driver targets exactly one family. The bit order is the
    /// historical model numbering, see [`ModelMask::from_legacy_index`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModelMask: u32 {
        /// HP OmniBook XE3 GF, most Toshiba Satellites.
        const XE3GF = 1 << 0;
        /// HP OmniBook XE3 GC, GD, GE and compatibles.
        const XE3GC = 1 << 1;
        /// HP OmniBook 500 and compatibles.
        const OB500 = 1 << 2;
        /// HP OmniBook 510.
        const OB510 = 1 << 3;
        /// HP OmniBook 6000 and compatibles.
        const OB6000 = 1 << 4;
        /// HP OmniBook 6100.
        const OB6100 = 1 << 5;
        /// HP OmniBook xe4500 and compatibles.
        const XE4500 = 1 << 6;
        /// HP OmniBook 4150.
        const OB4150 = 1 << 7;
        /// HP OmniBook XE2.
        const XE2 = 1 << 8;
        /// Fujitsu Amilo D.
        const AMILOD = 1 << 9;
        /// Toshiba Satellite P10, P15, P20 and compatibles.
        const TSP10 = 1 << 10;
        /// Toshiba Satellite M30X, M35X, M70 (Compal ACL10).
        const TSM30X = 1 << 11;
        /// Toshiba Satellite M40X and compatibles (Compal ACY10/ACY11).
        const TSM40 = 1 << 12;
        /// Toshiba Satellite A105 and compatibles.
        const TSA105 = 1 << 13;
    }
}

impl ModelMask {
    /// Maps the historical `ectype` module parameter onto a model.
    ///
    /// `0` means "not configured" and yields the empty mask; `n` selects bit
    /// `n - 1`. Indices past the last family are rejected.
    #[must_use]
    pub const fn from_legacy_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::empty()),
            1..=14 => Self::from_bits(1 << (index - 1)),
            _ => None,
        }
    }

    /// Inverse of [`from_legacy_index`](Self::from_legacy_index) for
    /// single-family masks; multi-family masks report their lowest family.
    #[must_use]
    pub const fn legacy_index(self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.bits().trailing_zeros() + 1
        }
    }

    /// Marketing name of a single family.
    #[must_use]
    pub fn describe(self) -> &'static str {
        NAMES
            .iter()
            .find(|(model, _)| *model == self)
            .map_or("unknown", |(_, name)| name)
    }
}

const NAMES: [(ModelMask, &str); 14] = [
    (ModelMask::XE3GF, "HP OmniBook XE3 GF, most Toshiba Satellites"),
    (ModelMask::XE3GC, "HP OmniBook XE3 GC, GD, GE and compatible"),
    (ModelMask::OB500, "HP OmniBook 500 and compatible"),
    (ModelMask::OB510, "HP OmniBook 510"),
    (ModelMask::OB6000, "HP OmniBook 6000 and compatible"),
    (ModelMask::OB6100, "HP OmniBook 6100"),
    (ModelMask::XE4500, "HP OmniBook xe4500 and compatible"),
    (ModelMask::OB4150, "HP OmniBook 4150"),
    (ModelMask::XE2, "HP OmniBook XE2"),
    (ModelMask::AMILOD, "Fujitsu Amilo D"),
    (ModelMask::TSP10, "Toshiba Satellite P10, P15, P20 and compatible"),
    (ModelMask::TSM30X, "Toshiba Satellite M30X, M35X, M70"),
    (ModelMask::TSM40, "Toshiba Satellite M40X and compatible"),
    (ModelMask::TSA105, "Toshiba Satellite A105 and compatible"),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn legacy_index_round_trips_every_family() {
        for flag in ModelMask::all().iter() {
            let index = flag.legacy_index();
            assert_eq!(ModelMask::from_legacy_index(index), Some(flag));
        }
        assert_eq!(ModelMask::from_legacy_index(0), Some(ModelMask::empty()));
        assert_eq!(ModelMask::from_legacy_index(15), None);
    }

    #[test]
    fn families_have_names() {
        assert_eq!(ModelMask::TSM40.describe(), "Toshiba Satellite M40X and compatible");
        assert_eq!((ModelMask::XE3GF | ModelMask::XE2).describe(), "unknown");
    }
}
