use crate::registers::{kbc, pio};
use crate::{BackendKind, Binding, Driver, Operation, Result, TableEntry};
use core::sync::atomic::{AtomicBool, Ordering};
use log::info;

/// How a model switches its backlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankMethod {
    /// Dedicated on/off commands.
    Command,
    /// A backlight bit in a shared register.
    Mask,
}

pub const BLANK_TABLE: [TableEntry<BlankMethod>; 3] = [
    TableEntry::with(
        models!(XE3GF | XE3GC | AMILOD | TSP10 | TSM30X | TSM40),
        Operation::command(BackendKind::Kbc, kbc::LCD_ON, kbc::LCD_OFF),
        BlankMethod::Command,
    ),
    TableEntry::with(
        models!(OB500 | OB6000 | XE2),
        Operation::simple_byte(BackendKind::Pio, pio::OB500_GPO1, pio::OB500_BKLT_MASK)
            .switching(pio::OB500_BKLT_MASK),
        BlankMethod::Mask,
    ),
    TableEntry::with(
        models!(OB510 | OB6100),
        Operation::simple_byte(BackendKind::Pio, pio::OB510_GPIO, pio::OB510_BKLT_MASK)
            .switching(pio::OB510_BKLT_MASK),
        BlankMethod::Mask,
    ),
];

/// LCD backlight switch, used for console blanking.
#[derive(Debug)]
pub struct Blank {
    binding: Binding,
    method: BlankMethod,
    blanked: AtomicBool,
}

impl Blank {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`](crate::Error::NoSuchDevice) on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, method) = driver.bind("blank", &BLANK_TABLE)?;
        Ok(Self {
            binding,
            method: *method,
            blanked: AtomicBool::new(false),
        })
    }

    /// Turns the backlight off (`true`) or back on.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn set(&self, blank: bool) -> Result<()> {
        match self.method {
            BlankMethod::Command => self.binding.toggle(!blank)?,
            BlankMethod::Mask => self.binding.apply_mask(!blank)?,
        }
        self.blanked.store(blank, Ordering::Relaxed);
        info!("LCD backlight turned {}", super::on_off(!blank));
        Ok(())
    }

    /// The last state set.
    #[must_use]
    pub fn is_blanked(&self) -> bool {
        self.blanked.load(Ordering::Relaxed)
    }
}
