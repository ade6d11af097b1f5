use crate::registers::{cdi, kbc};
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};
use core::sync::atomic::{AtomicBool, Ordering};
use log::{error, info};

pub const TOUCHPAD_TABLE: [TableEntry; 2] = [
    TableEntry::new(
        models!(XE3GF | XE3GC | TSP10),
        Operation::command(BackendKind::Kbc, kbc::TOUCHPAD_ENABLE, kbc::TOUCHPAD_DISABLE),
    ),
    TableEntry::new(
        models!(TSM30X),
        Operation::command(BackendKind::Cdi, cdi::TOUCHPAD_ON, cdi::TOUCHPAD_OFF)
            .writing(cdi::FN_INDEX),
    ),
];

/// Touchpad enable switch.
///
/// The hardware cannot report the state, so the adapter remembers the last
/// command. Dropping the adapter leaves the touchpad enabled.
#[derive(Debug)]
pub struct Touchpad {
    binding: Binding,
    enabled: AtomicBool,
}

impl Touchpad {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("touchpad", &TOUCHPAD_TABLE)?;
        Ok(Self {
            binding,
            enabled: AtomicBool::new(true),
        })
    }

    /// # Errors
    ///
    /// Backend errors; the remembered state is unchanged then.
    pub fn set(&self, enabled: bool) -> Result<()> {
        if let Err(err) = self.binding.toggle(enabled) {
            error!("failed touchpad {} command", if enabled { "enable" } else { "disable" });
            return Err(err);
        }
        self.enabled.store(enabled, Ordering::Relaxed);
        info!("{} touchpad", if enabled { "enabling" } else { "disabling" });
        Ok(())
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Re-disables the touchpad after a resume if it was disabled.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn resume(&self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            self.binding.toggle(false)
        }
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.is_enabled() {
            "Last touchpad action was an enable command.\n"
        } else {
            "Last touchpad action was a disable command.\n"
        }
    }
}

impl Drop for Touchpad {
    fn drop(&mut self) {
        if !self.is_enabled() && self.binding.toggle(true).is_err() {
            error!("failed to re-enable the touchpad");
        }
    }
}
