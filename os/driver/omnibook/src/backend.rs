//! Hardware access methods behind a common lifecycle.
//!
//! Every backend implements [`Backend`]; what it can do beyond that is
//! advertised through optional capability traits. A feature asks its bound
//! backend for a capability and gets [`Error::NoSuchDevice`] if the backend
//! lacks it, instead of calling through an empty function slot.

mod acpi;
mod cdi;
mod ec;
mod kbc;
mod pio;
mod smi;

pub use acpi::{AcpiBackend, TOSHIBA_BLUETOOTH_HID};
pub use cdi::CdiBackend;
pub use ec::EcBackend;
pub use kbc::KbcBackend;
pub use pio::PioBackend;
pub use smi::{LPC_BRIDGES, SmiBackend};

use crate::{
    BackendKind, DisplayFlags, Error, HotkeyFlags, Operation, Reading, Result, WirelessFlags,
};

/// Lifecycle and capability discovery of one access method.
///
/// The arena calls [`probe`](Self::probe) when the first user arrives and
/// [`dispose`](Self::dispose) when the last one leaves; both run serialized.
/// [`attach`](Self::attach)/[`detach`](Self::detach) bracket every binding
/// of an operation while the backend is ready.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Checks for and claims the hardware.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the hardware is absent; the backend then
    /// stays unusable. Other errors are treated the same except for
    /// [`Error::Interrupted`], which allows a later retry.
    fn probe(&self) -> Result<()> {
        Ok(())
    }

    /// Releases what [`probe`](Self::probe) claimed.
    fn dispose(&self) {}

    /// Claims per-operation resources.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if a resource is owned elsewhere.
    fn attach(&self, _op: &Operation) -> Result<()> {
        Ok(())
    }

    fn detach(&self, _op: &Operation) {}

    fn byte_reader(&self) -> Option<&dyn ByteRead> {
        None
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        None
    }

    fn wireless(&self) -> Option<&dyn WirelessControl> {
        None
    }

    fn display(&self) -> Option<&dyn DisplayControl> {
        None
    }

    fn hotkeys(&self) -> Option<&dyn HotkeyControl> {
        None
    }
}

pub trait ByteRead {
    /// Reads `op.read_addr`, masked by `op.read_mask` if non-zero.
    ///
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn byte_read(&self, op: &Operation) -> Result<u8>;
}

pub trait ByteWrite {
    /// Writes `value` to `op.write_addr`.
    ///
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn byte_write(&self, op: &Operation, value: u8) -> Result<()>;
}

/// WLAN and Bluetooth radios.
pub trait WirelessControl {
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn wireless_get(&self, op: &Operation) -> Result<Reading<WirelessFlags>>;

    /// Applies the `*_STA` bits of `state`; returns the bits honored.
    ///
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn wireless_set(&self, op: &Operation, state: WirelessFlags) -> Result<WirelessFlags>;
}

/// Video output switching.
pub trait DisplayControl {
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn display_get(&self, op: &Operation) -> Result<Reading<DisplayFlags>>;

    /// Activates the outputs in `state`; returns the bits honored.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] unless the backend can switch outputs.
    fn display_set(&self, _op: &Operation, _state: DisplayFlags) -> Result<DisplayFlags> {
        Err(Error::NoSuchDevice)
    }
}

/// Hotkey event sources.
pub trait HotkeyControl {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] unless the backend can report the state.
    fn hotkeys_get(&self, _op: &Operation) -> Result<Reading<HotkeyFlags>> {
        Err(Error::NoSuchDevice)
    }

    /// Enables the sources in `state` and disables the others; returns the
    /// bits honored.
    ///
    /// # Errors
    ///
    /// Backend specific; see the implementors.
    fn hotkeys_set(&self, op: &Operation, state: HotkeyFlags) -> Result<HotkeyFlags>;
}

/// Applies `op.read_mask` to a raw byte.
pub(crate) const fn masked(op: &Operation, raw: u8) -> u8 {
    if op.read_mask == 0 {
        raw
    } else {
        raw & op.read_mask
    }
}

/// Narrows a table address to an 8-bit register number.
pub(crate) fn register(addr: u32) -> Result<u8> {
    u8::try_from(addr).map_err(|_| Error::InvalidArgument)
}

/// Narrows a table address to an I/O port number.
pub(crate) fn port(addr: u32) -> Result<u16> {
    u16::try_from(addr).map_err(|_| Error::InvalidArgument)
}
