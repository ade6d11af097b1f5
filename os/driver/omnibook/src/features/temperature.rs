use crate::registers::{ob500, ob4150, xe3gc, xe3gf};
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};
use alloc::format;
use alloc::string::String;

pub const TEMPERATURE_TABLE: [TableEntry; 4] = [
    TableEntry::new(
        models!(XE3GF | TSP10 | TSM30X),
        Operation::simple_byte(BackendKind::Ec, xe3gf::CTMP, 0),
    ),
    TableEntry::new(
        models!(XE3GC | AMILOD),
        Operation::simple_byte(BackendKind::Ec, xe3gc::CTMP, 0),
    ),
    TableEntry::new(
        models!(OB500 | OB510 | OB6000 | OB6100 | XE4500 | XE2),
        Operation::simple_byte(BackendKind::Ec, ob500::CTMP, 0),
    ),
    TableEntry::new(
        models!(OB4150),
        Operation::simple_byte(BackendKind::Ec, ob4150::TMP, 0),
    ),
];

/// CPU temperature in degrees Celsius.
#[derive(Debug)]
pub struct Temperature {
    binding: Binding,
}

impl Temperature {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("temperature", &TEMPERATURE_TABLE)?;
        Ok(Self { binding })
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn cpu(&self) -> Result<u8> {
        self.binding.read()
    }

    /// # Errors
    ///
    /// As [`cpu`](Self::cpu).
    pub fn status(&self) -> Result<String> {
        Ok(format!("CPU temperature:            {:2} C\n", self.cpu()?))
    }
}
