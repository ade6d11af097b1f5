use crate::registers::{ob500, ob4150, xe3gc, xe3gf};
use crate::{
    BackendKind, Binding, DisplayFlags, Driver, Error, Operation, Reading, Result, TableEntry,
};
use core::fmt;
use log::info;

pub const DISPLAY_TABLE: [TableEntry; 6] = [
    TableEntry::new(models!(TSM30X), Operation::bare(BackendKind::Acpi)),
    TableEntry::new(models!(TSM40), Operation::bare(BackendKind::Smi)),
    TableEntry::new(
        models!(XE3GF | TSP10),
        Operation::simple_byte(BackendKind::Ec, xe3gf::STA1, xe3gf::STA1_CRTS_MASK),
    ),
    TableEntry::new(
        models!(XE3GC),
        Operation::simple_byte(BackendKind::Ec, xe3gc::STA1, xe3gc::CRTS_MASK),
    ),
    TableEntry::new(
        models!(OB500 | OB510 | OB6000 | OB6100 | XE4500),
        Operation::simple_byte(BackendKind::Ec, ob500::STA1, ob500::CRTS_MASK),
    ),
    TableEntry::new(
        models!(OB4150),
        Operation::simple_byte(BackendKind::Ec, ob4150::STA1, ob4150::CRTS_MASK),
    ),
];

/// Video outputs: detection everywhere, switching where the firmware
/// offers it.
#[derive(Debug)]
pub struct Display {
    binding: Binding,
}

impl Display {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("display", &DISPLAY_TABLE)?;
        Ok(Self { binding })
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn state(&self) -> Result<Reading<DisplayFlags>> {
        self.binding.display_get()
    }

    /// Activates exactly the outputs in `outputs`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an empty set or detection bits,
    /// [`Error::NoSuchDevice`] if the outputs cannot be switched on this
    /// model.
    pub fn set(&self, outputs: DisplayFlags) -> Result<()> {
        if outputs.is_empty() || !DisplayFlags::OUTPUTS.contains(outputs) {
            return Err(Error::InvalidArgument);
        }
        self.binding.display_set(outputs)?;
        info!("display outputs set to {outputs:?}");
        Ok(())
    }

    /// # Errors
    ///
    /// As [`state`](Self::state).
    pub fn status(&self) -> Result<DisplayStatus> {
        self.state().map(DisplayStatus)
    }
}

/// Printable display state; one line per reported bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStatus(pub Reading<DisplayFlags>);

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PORTS: [(DisplayFlags, DisplayFlags, &str); 3] = [
            (DisplayFlags::LCD_ON, DisplayFlags::LCD_DET, "Internal LCD"),
            (DisplayFlags::CRT_ON, DisplayFlags::CRT_DET, "External display"),
            (DisplayFlags::TVO_ON, DisplayFlags::TVO_DET, "External TV"),
        ];
        for (active, detected, name) in PORTS {
            if let Some(on) = self.0.get(active) {
                writeln!(f, "{name} port is {}", super::on_off(on))?;
            }
            if let Some(present) = self.0.get(detected) {
                let presence = if present { "present" } else { "not present" };
                writeln!(f, "{name} is {presence}")?;
            }
        }
        Ok(())
    }
}
