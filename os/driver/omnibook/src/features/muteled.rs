use crate::registers::kbc;
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};
use core::sync::atomic::{AtomicBool, Ordering};
use log::{error, info};

pub const MUTELED_TABLE: [TableEntry; 1] = [TableEntry::new(
    models!(XE4500),
    Operation::command(BackendKind::Kbc, kbc::MUTELED_ON, kbc::MUTELED_OFF),
)];

/// Audio mute indicator.
#[derive(Debug)]
pub struct MuteLed {
    binding: Binding,
    on: AtomicBool,
}

impl MuteLed {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("muteled", &MUTELED_TABLE)?;
        Ok(Self {
            binding,
            on: AtomicBool::new(false),
        })
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn set(&self, on: bool) -> Result<()> {
        if let Err(err) = self.binding.toggle(on) {
            error!("failed muteled {} command", super::on_off(on));
            return Err(err);
        }
        self.on.store(on, Ordering::Relaxed);
        info!("switching mute LED to {} state", super::on_off(on));
        Ok(())
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Relaxed)
    }

    /// Re-applies the remembered state after a resume.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn resume(&self) -> Result<()> {
        self.binding.toggle(self.is_on())
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.is_on() {
            "Last mute LED action was an on command.\n"
        } else {
            "Last mute LED action was an off command.\n"
        }
    }
}
