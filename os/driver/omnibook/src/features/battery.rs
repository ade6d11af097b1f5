use crate::registers::{amilod, xe3gc, xe3gf};
use crate::{BackendKind, Binding, Driver, Error, Operation, Result, TableEntry};
use alloc::string::String;
use core::fmt::{self, Write};

/// Where one EC family keeps its battery banks.
///
/// Addresses are those of battery 0; battery `n` is `n * stride` further.
/// Words are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryLayout {
    pub count: u8,
    /// Bit `n` set: battery `n` is inserted.
    pub presence: u32,
    pub stride: u32,
    pub chemistry: u32,
    /// Set for Li-Ion, clear for NiMH.
    pub chemistry_mask: u8,
    pub status: u32,
    pub remaining: u32,
    pub voltage: u32,
    pub design_voltage: u32,
    pub design_capacity: u32,
    pub serial: Option<u32>,
    pub last_full: Option<u32>,
    /// Without a gauge register the charge is derived from the capacities.
    pub gauge: Option<u32>,
}

const XE3GF_LAYOUT: BatteryLayout = BatteryLayout {
    count: 2,
    presence: xe3gf::BAL,
    stride: xe3gf::BATTERY_STRIDE,
    chemistry: xe3gf::BTY0,
    chemistry_mask: xe3gf::BTY_MASK,
    status: xe3gf::BST0,
    remaining: xe3gf::BRC0,
    voltage: xe3gf::BPV0,
    design_voltage: xe3gf::BDV0,
    design_capacity: xe3gf::BDC0,
    serial: Some(xe3gf::BSN0),
    last_full: Some(xe3gf::BFC0),
    gauge: Some(xe3gf::GAU0),
};

const XE3GC_LAYOUT: BatteryLayout = BatteryLayout {
    count: 2,
    presence: xe3gc::BAT,
    stride: xe3gf::BATTERY_STRIDE,
    chemistry: xe3gc::BTY0,
    chemistry_mask: xe3gc::BTY_MASK,
    status: xe3gc::BST0,
    remaining: xe3gc::BRC0,
    voltage: xe3gc::BPV0,
    design_voltage: xe3gc::BDV0,
    design_capacity: xe3gc::BDC0,
    serial: None,
    last_full: None,
    gauge: None,
};

const AMILOD_LAYOUT: BatteryLayout = BatteryLayout {
    chemistry: amilod::BTY0,
    chemistry_mask: amilod::BTY_MASK,
    status: amilod::BST0,
    remaining: amilod::BRC0,
    voltage: amilod::BPV0,
    design_voltage: amilod::BDV0,
    design_capacity: amilod::BDC0,
    ..XE3GC_LAYOUT
};

pub const BATTERY_TABLE: [TableEntry<BatteryLayout>; 4] = [
    TableEntry::with(
        models!(XE3GF | TSP10),
        Operation::simple_byte(BackendKind::Ec, xe3gf::BAL, 0),
        XE3GF_LAYOUT,
    ),
    TableEntry::with(
        models!(TSM30X),
        Operation::simple_byte(BackendKind::Ec, xe3gf::BAL, 0),
        BatteryLayout {
            count: 1,
            ..XE3GF_LAYOUT
        },
    ),
    TableEntry::with(
        models!(XE3GC),
        Operation::simple_byte(BackendKind::Ec, xe3gc::BAT, 0),
        XE3GC_LAYOUT,
    ),
    TableEntry::with(
        models!(AMILOD),
        Operation::simple_byte(BackendKind::Ec, xe3gc::BAT, 0),
        AMILOD_LAYOUT,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chemistry {
    LiIon,
    NiMh,
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::LiIon => "Li-Ion",
            Self::NiMh => "NiMH",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeState {
    Critical,
    Charging,
    Discharging,
    Charged,
    /// Charging and discharging at once.
    Unknown,
}

impl ChargeState {
    /// Decodes a battery status register.
    #[must_use]
    pub const fn from_status(bits: u8) -> Self {
        let charging = bits & xe3gf::BST_CHR != 0;
        let discharging = bits & xe3gf::BST_DSC != 0;
        if charging && discharging {
            Self::Unknown
        } else if bits & xe3gf::BST_CRT != 0 {
            Self::Critical
        } else if charging {
            Self::Charging
        } else if discharging {
            Self::Discharging
        } else {
            Self::Charged
        }
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Critical => "critical",
            Self::Charging => "charging",
            Self::Discharging => "discharging",
            Self::Charged => "charged",
            Self::Unknown => "unknown",
        })
    }
}

/// Static data of an inserted battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryInfo {
    pub chemistry: Chemistry,
    /// 0 if the firmware does not report it.
    pub serial: u16,
    /// mV
    pub design_voltage: u16,
    /// mAh
    pub design_capacity: u16,
}

/// Charge of an inserted battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    pub state: ChargeState,
    /// mAh
    pub remaining: u16,
    /// mV
    pub voltage: u16,
    /// mAh, 0 if the firmware does not report it.
    pub last_full: u16,
    /// Percent.
    pub gauge: u8,
}

/// One battery in the classic report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReport {
    pub index: u8,
    pub info: BatteryInfo,
    pub status: BatteryStatus,
}

impl fmt::Display for BatteryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { index, info, status } = self;
        writeln!(f, "Battery:            {index:>11}")?;
        writeln!(f, "Type:               {:>11}", info.chemistry)?;
        if info.serial != 0 {
            writeln!(f, "Serial Number:      {:>11}", info.serial)?;
        }
        writeln!(f, "Present Voltage:    {:>11} mV", status.voltage)?;
        writeln!(f, "Design Voltage:     {:>11} mV", info.design_voltage)?;
        writeln!(f, "Remaining Capacity: {:>11} mAh", status.remaining)?;
        if status.last_full != 0 {
            writeln!(f, "Last Full Capacity: {:>11} mAh", status.last_full)?;
        }
        writeln!(f, "Design Capacity:    {:>11} mAh", info.design_capacity)?;
        writeln!(f, "Gauge:              {:>11} %", status.gauge)?;
        writeln!(f, "Status:             {:>11}", status.state)?;
        writeln!(f)
    }
}

/// Battery banks in the EC.
#[derive(Debug)]
pub struct Battery {
    binding: Binding,
    layout: BatteryLayout,
}

impl Battery {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, layout) = driver.bind("battery", &BATTERY_TABLE)?;
        Ok(Self {
            binding,
            layout: *layout,
        })
    }

    /// Number of battery bays.
    #[must_use]
    pub const fn count(&self) -> u8 {
        self.layout.count
    }

    fn bank(&self, n: u8) -> Result<u32> {
        if n >= self.layout.count {
            return Err(Error::InvalidArgument);
        }
        Ok(u32::from(n) * self.layout.stride)
    }

    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a bay beyond [`count`](Self::count),
    /// backend errors otherwise.
    pub fn present(&self, n: u8) -> Result<bool> {
        self.bank(n)?;
        let bits = self.binding.read_at(self.layout.presence)?;
        Ok(bits & (xe3gf::BAL0_MASK << n) != 0)
    }

    /// `None` if bay `n` is empty.
    ///
    /// # Errors
    ///
    /// As [`present`](Self::present).
    pub fn info(&self, n: u8) -> Result<Option<BatteryInfo>> {
        if !self.present(n)? {
            return Ok(None);
        }
        let bank = self.bank(n)?;
        let layout = &self.layout;

        let kind = self.binding.read_at(layout.chemistry + bank)?;
        let chemistry = if kind & layout.chemistry_mask != 0 {
            Chemistry::LiIon
        } else {
            Chemistry::NiMh
        };
        let serial = match layout.serial {
            Some(addr) => self.binding.read_u16_at(addr + bank)?,
            None => 0,
        };
        Ok(Some(BatteryInfo {
            chemistry,
            serial,
            design_voltage: self.binding.read_u16_at(layout.design_voltage + bank)?,
            design_capacity: self.binding.read_u16_at(layout.design_capacity + bank)?,
        }))
    }

    /// `None` if bay `n` is empty.
    ///
    /// # Errors
    ///
    /// As [`present`](Self::present).
    pub fn status(&self, n: u8) -> Result<Option<BatteryStatus>> {
        if !self.present(n)? {
            return Ok(None);
        }
        let bank = self.bank(n)?;
        let layout = &self.layout;

        let state = ChargeState::from_status(self.binding.read_at(layout.status + bank)?);
        let remaining = self.binding.read_u16_at(layout.remaining + bank)?;
        let last_full = match layout.last_full {
            Some(addr) => self.binding.read_u16_at(addr + bank)?,
            None => 0,
        };
        let gauge = match layout.gauge {
            Some(addr) => self.binding.read_at(addr + bank)?,
            None => {
                let design = self.binding.read_u16_at(layout.design_capacity + bank)?;
                percent(remaining, design)
            }
        };
        Ok(Some(BatteryStatus {
            state,
            remaining,
            voltage: self.binding.read_u16_at(layout.voltage + bank)?,
            last_full,
            gauge,
        }))
    }

    /// Info and status of bay `n` together; `None` if it is empty.
    ///
    /// # Errors
    ///
    /// As [`present`](Self::present).
    pub fn report(&self, n: u8) -> Result<Option<BatteryReport>> {
        let (Some(info), Some(status)) = (self.info(n)?, self.status(n)?) else {
            return Ok(None);
        };
        Ok(Some(BatteryReport {
            index: n,
            info,
            status,
        }))
    }

    /// Reports of every inserted battery.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn summary(&self) -> Result<String> {
        let mut text = String::new();
        for n in 0..self.count() {
            if let Some(report) = self.report(n)? {
                write!(text, "{report}").map_err(|_| Error::OutOfMemory)?;
            }
        }
        if text.is_empty() {
            text.push_str("No battery present\n");
        }
        Ok(text)
    }
}

/// `remaining` as a share of `design`, capped at 100.
fn percent(remaining: u16, design: u16) -> u8 {
    if design == 0 {
        return 0;
    }
    let share = (u32::from(remaining) * 100 / u32::from(design)).min(100);
    u8::try_from(share).unwrap_or(100)
}
