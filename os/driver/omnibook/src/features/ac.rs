use crate::registers::{ob500, ob4150, xe3gc, xe3gf};
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};

pub const AC_TABLE: [TableEntry; 5] = [
    TableEntry::new(
        models!(XE3GF | TSP10 | TSM30X),
        Operation::simple_byte(BackendKind::Ec, xe3gf::ADP, xe3gf::ADP_MASK),
    ),
    TableEntry::new(
        models!(XE3GC | AMILOD),
        Operation::simple_byte(BackendKind::Ec, xe3gc::STA1, xe3gc::AC_MASK),
    ),
    TableEntry::new(
        models!(OB500 | OB510 | OB6000 | OB6100 | XE4500),
        Operation::simple_byte(BackendKind::Ec, ob500::STA2, ob500::ADP_MASK),
    ),
    TableEntry::new(
        models!(OB4150),
        Operation::simple_byte(BackendKind::Ec, ob4150::ADP, ob4150::ADP_MASK),
    ),
    TableEntry::new(
        models!(XE2),
        Operation::simple_byte(BackendKind::Ec, ob500::STA2, ob500::ADP_MASK),
    ),
];

/// AC adapter presence.
#[derive(Debug)]
pub struct Ac {
    binding: Binding,
}

impl Ac {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("ac", &AC_TABLE)?;
        Ok(Self { binding })
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn online(&self) -> Result<bool> {
        Ok(self.binding.read()? != 0)
    }

    /// The classic one-line status.
    ///
    /// # Errors
    ///
    /// As [`online`](Self::online).
    pub fn status(&self) -> Result<&'static str> {
        Ok(if self.online()? {
            "AC on-line\n"
        } else {
            "AC off-line\n"
        })
    }
}
