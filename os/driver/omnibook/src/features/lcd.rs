use crate::registers::{a105, amilod, cdi, xe3gc, xe3gf};
use crate::{BackendKind, Binding, Driver, Error, ModelMask, Operation, Result, TableEntry};
use alloc::format;
use alloc::string::String;
use log::info;

pub const LCD_TABLE: [TableEntry; 5] = [
    TableEntry::new(
        models!(TSM30X),
        Operation::bare(BackendKind::Cdi)
            .reading(cdi::LCD_READ)
            .writing(cdi::LCD_WRITE),
    ),
    TableEntry::new(
        models!(XE3GF | TSP10 | TSM40),
        Operation::simple_byte(BackendKind::Ec, xe3gf::BRTS, xe3gf::BRTS_MASK),
    ),
    TableEntry::new(
        models!(XE3GC),
        Operation::simple_byte(BackendKind::Ec, xe3gc::BTVL, xe3gc::BTVL_MASK),
    ),
    TableEntry::new(
        models!(AMILOD),
        Operation::simple_byte(BackendKind::Ec, amilod::CBRG, amilod::CBRG_MASK),
    ),
    TableEntry::new(
        models!(TSA105),
        Operation::simple_byte(BackendKind::Ec, a105::BNDT, a105::BNDT_MASK),
    ),
];

/// Models with eight brightness steps instead of eleven.
const SHORT_SCALE: ModelMask = models!(TSM30X | TSM40 | TSA105);

/// LCD backlight brightness.
#[derive(Debug)]
pub struct Lcd {
    binding: Binding,
    max: u8,
}

impl Lcd {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("lcd", &LCD_TABLE)?;
        let max = if driver.model().intersects(SHORT_SCALE) { 7 } else { 10 };
        info!("LCD brightness is between 0 and {max}");
        Ok(Self { binding, max })
    }

    #[must_use]
    pub const fn max_brightness(&self) -> u8 {
        self.max
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn brightness(&self) -> Result<u8> {
        self.binding.read()
    }

    /// # Errors
    ///
    /// [`Error::InvalidArgument`] above [`max_brightness`](Self::max_brightness),
    /// backend errors otherwise.
    pub fn set_brightness(&self, level: u8) -> Result<()> {
        if level > self.max {
            return Err(Error::InvalidArgument);
        }
        self.binding.write(level)
    }

    /// # Errors
    ///
    /// As [`brightness`](Self::brightness).
    pub fn status(&self) -> Result<String> {
        Ok(format!("LCD brightness: {:2}\n", self.brightness()?))
    }
}
