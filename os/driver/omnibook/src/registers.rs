//! Register maps of the supported controllers.
//!
//! EC registers are named after the family that introduced them; later
//! families reuse many of them.

/// HP OmniBook XE3 GF and the Toshiba models sharing its EC firmware.
pub mod xe3gf {
    pub const BAL: u32 = 0x9A;
    pub const BAL0_MASK: u8 = 0x01;
    pub const STA1: u32 = 0x9C;
    pub const STA1_CRTS_MASK: u8 = 0x40;
    pub const Q0A: u32 = 0xA1;
    pub const Q0A_DOCK_MASK: u8 = 0x01;
    pub const ADP: u32 = 0xA3;
    pub const ADP_MASK: u8 = 0x20;
    /// First fan trip point; `FOT..=FSD7` are eight consecutive registers.
    pub const FOT: u32 = 0xA5;
    pub const FSRD: u32 = 0xAD;
    pub const FAN_ON_MASK: u8 = 0x02;
    pub const CTMP: u32 = 0xB0;
    pub const BRTS: u32 = 0xB9;
    pub const BRTS_MASK: u8 = 0x0F;

    /// Battery 0; battery `n` lives `n * BATTERY_STRIDE` further.
    pub const BTY0: u32 = 0xC0;
    pub const BTY_MASK: u8 = 0x80;
    pub const BST0: u32 = 0xC1;
    pub const BRC0: u32 = 0xC2;
    pub const BSN0: u32 = 0xC4;
    pub const BPV0: u32 = 0xC6;
    pub const BDV0: u32 = 0xC8;
    pub const BDC0: u32 = 0xCA;
    pub const BFC0: u32 = 0xCC;
    pub const GAU0: u32 = 0xCE;

    /// Distance between battery banks, shared by every family with banks.
    pub const BATTERY_STRIDE: u32 = 0x10;

    /// Battery status bits.
    pub const BST_DSC: u8 = 0x01;
    pub const BST_CHR: u8 = 0x02;
    pub const BST_CRT: u8 = 0x04;
}

/// HP OmniBook XE3 GC/GD/GE.
pub mod xe3gc {
    pub const CTMP: u32 = 0x28;
    pub const STA1: u32 = 0x30;
    pub const AC_MASK: u8 = 0x40;
    pub const CRTS_MASK: u8 = 0x04;
    pub const BAT: u32 = 0x3E;
    /// Bit `n` set: battery `n` present.
    pub const BAT0_MASK: u8 = 0x01;
    pub const BST0: u32 = 0x40;
    pub const BRC0: u32 = 0x43;
    pub const BPV0: u32 = 0x45;
    pub const BDV0: u32 = 0x47;
    pub const BDC0: u32 = 0x49;
    pub const BTY0: u32 = 0x4A;
    pub const BTY_MASK: u8 = 0x01;
    pub const BTVL: u32 = 0x6A;
    pub const BTVL_MASK: u8 = 0x0F;
}

/// Fujitsu Amilo D.
pub mod amilod {
    pub const CTMP: u32 = 0x28;
    pub const BDC0: u32 = 0x40;
    pub const BDV0: u32 = 0x42;
    pub const BTY0: u32 = 0x44;
    pub const BTY_MASK: u8 = 0x01;
    pub const BST0: u32 = 0x45;
    pub const BRC0: u32 = 0x48;
    pub const BPV0: u32 = 0x4A;
    pub const CBRG: u32 = 0x6F;
    pub const CBRG_MASK: u8 = 0x0F;
}

/// HP OmniBook 500 and the 510/6000/6100/xe4500 variants.
pub mod ob500 {
    pub const STA1: u32 = 0x44;
    pub const DCKS_MASK: u8 = 0x80;
    pub const CRTS_MASK: u8 = 0x20;
    pub const STA2: u32 = 0x50;
    pub const ADP_MASK: u8 = 0x02;
    pub const CTMP: u32 = 0x55;
}

/// OmniBook 6000/6100 fan status.
pub mod ob6000 {
    pub const STA1: u32 = 0x77;
    pub const FAN_MASK: u8 = 0x10;
}

/// HP OmniBook 4150. The Amilo D shares its fan register.
pub mod ob4150 {
    pub const TMP: u32 = 0x28;
    pub const ADP: u32 = 0x30;
    pub const ADP_MASK: u8 = 0x40;
    pub const DCID: u32 = 0x2C;
    pub const FAN: u32 = 0x2E;
    pub const FAN_MASK: u8 = 0x01;
    pub const STA1: u32 = 0x2F;
    pub const CRTS_MASK: u8 = 0x20;
}

/// Toshiba Satellite A105.
pub mod a105 {
    pub const BNDT: u32 = 0xA3;
    pub const BNDT_MASK: u8 = 0x0F;
}

/// Raw I/O ports of the older OmniBooks.
pub mod pio {
    /// OmniBook 500/6000 and XE2 power control.
    pub const OB500_GPO1: u32 = 0x8034;
    pub const OB500_FAN_OFF_MASK: u8 = 0x08;
    pub const OB500_FAN_ON_MASK: u8 = 0x0A;
    pub const OB500_BKLT_MASK: u8 = 0x40;
    pub const XE2_FAN_MASK: u8 = 0x02;
    /// OmniBook 510/6100 fan control.
    pub const OB510_GPO2: u32 = 0x118F;
    pub const OB510_FAN_OFF_MASK: u8 = 0x10;
    pub const OB510_FAN_ON_MASK: u8 = 0x18;
    /// OmniBook 510/6100 backlight.
    pub const OB510_GPIO: u32 = 0x11B9;
    pub const OB510_BKLT_MASK: u8 = 0x01;
}

/// Keyboard controller parameters following the vendor control command.
pub mod kbc {
    pub const ONETOUCH_ENABLE: u8 = 0x90;
    pub const ONETOUCH_DISABLE: u8 = 0x91;
    pub const MUTELED_ON: u8 = 0x94;
    pub const MUTELED_OFF: u8 = 0x95;
    pub const TOUCHPAD_ENABLE: u8 = 0xAA;
    pub const TOUCHPAD_DISABLE: u8 = 0xA9;
    pub const LCD_ON: u8 = 0xE1;
    pub const LCD_OFF: u8 = 0xE2;
}

/// Compal index/data interface of the Satellite M30X/M70.
pub mod cdi {
    pub const INDEX_PORT: u16 = 0x300;
    pub const DATA_PORT: u16 = 0x301;
    pub const FN_INDEX: u32 = 0x45;
    pub const FN_ENABLE: u8 = 0x75;
    pub const LCD_READ: u32 = 0x5E;
    pub const LCD_WRITE: u32 = 0x5F;
    pub const TOUCHPAD_ON: u8 = 0x85;
    pub const TOUCHPAD_OFF: u8 = 0x80;
}
