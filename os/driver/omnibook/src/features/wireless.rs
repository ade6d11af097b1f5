use crate::{
    BackendKind, Binding, Driver, Error, Operation, Reading, Result, TableEntry, WirelessFlags,
};
use alloc::format;
use alloc::string::String;
use log::info;

pub const BLUETOOTH_TABLE: [TableEntry; 2] = [
    TableEntry::new(models!(TSM30X), Operation::bare(BackendKind::Acpi)),
    TableEntry::new(models!(TSM40), Operation::bare(BackendKind::Smi)),
];

pub const WIFI_TABLE: [TableEntry; 2] = [
    TableEntry::new(models!(TSM30X), Operation::bare(BackendKind::Acpi)),
    TableEntry::new(models!(TSM40), Operation::bare(BackendKind::Smi)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadioKind {
    Bluetooth,
    Wifi,
}

impl RadioKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bluetooth => "Bluetooth",
            Self::Wifi => "WLAN",
        }
    }

    /// The presence bit.
    #[must_use]
    pub const fn present(self) -> WirelessFlags {
        match self {
            Self::Bluetooth => WirelessFlags::BT_EX,
            Self::Wifi => WirelessFlags::WIFI_EX,
        }
    }

    /// The power bit.
    #[must_use]
    pub const fn power(self) -> WirelessFlags {
        match self {
            Self::Bluetooth => WirelessFlags::BT_STA,
            Self::Wifi => WirelessFlags::WIFI_STA,
        }
    }

    const fn table(self) -> &'static [TableEntry] {
        match self {
            Self::Bluetooth => &BLUETOOTH_TABLE,
            Self::Wifi => &WIFI_TABLE,
        }
    }
}

/// One radio of a shared wireless state word.
#[derive(Debug)]
pub struct Radio {
    binding: Binding,
    kind: RadioKind,
}

impl Radio {
    /// Binds the radio and checks that the adapter is fitted.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models or without the adapter.
    pub fn probe(driver: &Driver, kind: RadioKind) -> Result<Self> {
        let (binding, ()) = driver.bind(kind.name(), kind.table())?;
        if binding.wireless_get()?.get(kind.present()) != Some(true) {
            info!("no {} adapter", kind.name());
            return Err(Error::NoSuchDevice);
        }
        Ok(Self { binding, kind })
    }

    #[must_use]
    pub const fn kind(&self) -> RadioKind {
        self.kind
    }

    /// The whole state word the radio shares with its sibling.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn state(&self) -> Result<Reading<WirelessFlags>> {
        self.binding.wireless_get()
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn enabled(&self) -> Result<bool> {
        Ok(self.state()?.get(self.kind.power()) == Some(true))
    }

    /// Powers the radio up or down, leaving the other radio as it is.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the backend cannot switch this radio,
    /// backend errors otherwise.
    pub fn set(&self, enabled: bool) -> Result<()> {
        let power = self.kind.power();
        let mut next = self.state()?.state & (WirelessFlags::BT_STA | WirelessFlags::WIFI_STA);
        next.set(power, enabled);
        if !self.binding.wireless_set(next)?.contains(power) {
            return Err(Error::InvalidArgument);
        }
        info!("{} adapter {}", self.kind.name(), super::enabled(enabled));
        Ok(())
    }

    /// # Errors
    ///
    /// As [`state`](Self::state).
    pub fn status(&self) -> Result<String> {
        let reading = self.state()?;
        let present = reading.get(self.kind.present()) == Some(true);
        let powered = reading.get(self.kind.power()) == Some(true);
        let mut text = format!(
            "{} adapter is {} and {}.\n",
            self.kind.name(),
            if present { "present" } else { "absent" },
            super::enabled(powered),
        );
        if let Some(engaged) = reading.get(WirelessFlags::KILLSWITCH) {
            text.push_str(if engaged {
                "Kill switch is on.\n"
            } else {
                "Kill switch is off.\n"
            });
        }
        Ok(text)
    }
}
