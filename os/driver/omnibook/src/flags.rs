//! State words exchanged with the composite backends.

use bitflags::{Flags, bitflags};

bitflags! {
    /// Radio state. `*_EX` bits report presence, `*_STA` bits power.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WirelessFlags: u32 {
        const WIFI_EX = 1 << 0;
        const WIFI_STA = 1 << 1;
        /// The hardware kill switch is engaged.
        const KILLSWITCH = 1 << 2;
        const BT_EX = 1 << 3;
        const BT_STA = 1 << 4;
    }
}

bitflags! {
    /// Video outputs. `*_ON` bits are active outputs, `*_DET` bits attached
    /// displays.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DisplayFlags: u32 {
        const LCD_ON = 1 << 0;
        const CRT_ON = 1 << 1;
        const TVO_ON = 1 << 2;
        const LCD_DET = 1 << 4;
        const CRT_DET = 1 << 5;
        const TVO_DET = 1 << 6;
    }
}

bitflags! {
    /// Hotkey sources.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HotkeyFlags: u32 {
        /// OneTouch buttons.
        const ONETOUCH = 1 << 0;
        const MULTIMEDIA = 1 << 1;
        /// Fn key combinations.
        const FN = 1 << 2;
        /// Sticky Fn key.
        const STICK = 1 << 3;
        /// Press Fn twice to lock it.
        const TWICE_LOCK = 1 << 4;
        /// Dock events.
        const DOCK = 1 << 5;
        /// Fn+F5 display switching.
        const FNF5 = 1 << 6;
    }
}

impl DisplayFlags {
    /// Output bits only.
    pub const OUTPUTS: Self = Self::LCD_ON.union(Self::CRT_ON).union(Self::TVO_ON);
    /// Detection bits only.
    pub const DETECTED: Self = Self::LCD_DET.union(Self::CRT_DET).union(Self::TVO_DET);
}

/// A state word together with the bits the hardware actually reports.
///
/// Bits outside `supported` are meaningless in `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reading<F> {
    pub state: F,
    pub supported: F,
}

impl<F: Flags + Copy> Reading<F> {
    #[must_use]
    pub const fn new(state: F, supported: F) -> Self {
        Self { state, supported }
    }

    /// `Some(on)` for a supported flag, `None` otherwise.
    #[must_use]
    pub fn get(&self, flag: F) -> Option<bool> {
        self.supported
            .contains(flag)
            .then(|| self.state.contains(flag))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unsupported_bits_read_as_unknown() {
        let reading = Reading::new(
            WirelessFlags::BT_EX | WirelessFlags::WIFI_STA,
            WirelessFlags::BT_EX | WirelessFlags::BT_STA,
        );
        assert_eq!(reading.get(WirelessFlags::BT_EX), Some(true));
        assert_eq!(reading.get(WirelessFlags::BT_STA), Some(false));
        assert_eq!(reading.get(WirelessFlags::WIFI_STA), None);
    }

    #[test]
    fn display_groups_partition_the_flags() {
        assert_eq!(DisplayFlags::OUTPUTS | DisplayFlags::DETECTED, DisplayFlags::all());
        assert!(!DisplayFlags::OUTPUTS.intersects(DisplayFlags::DETECTED));
    }
}
