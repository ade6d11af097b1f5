use crate::registers::{ob500, ob4150, xe3gf};
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};

pub const DOCK_TABLE: [TableEntry; 3] = [
    TableEntry::new(
        models!(XE3GF),
        Operation::simple_byte(BackendKind::Ec, xe3gf::Q0A, xe3gf::Q0A_DOCK_MASK),
    ),
    TableEntry::new(
        models!(OB500 | OB510 | OB6000 | OB6100),
        Operation::simple_byte(BackendKind::Ec, ob500::STA1, ob500::DCKS_MASK),
    ),
    TableEntry::new(
        models!(OB4150),
        Operation::simple_byte(BackendKind::Ec, ob4150::DCID, 0),
    ),
];

/// Docking station presence.
#[derive(Debug)]
pub struct Dock {
    binding: Binding,
}

impl Dock {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("dock", &DOCK_TABLE)?;
        Ok(Self { binding })
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn docked(&self) -> Result<bool> {
        Ok(self.binding.read()? != 0)
    }

    /// # Errors
    ///
    /// As [`docked`](Self::docked).
    pub fn status(&self) -> Result<&'static str> {
        Ok(if self.docked()? {
            "Laptop is docked\n"
        } else {
            "Laptop is undocked\n"
        })
    }
}
