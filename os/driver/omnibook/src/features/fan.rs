use crate::registers::{ob4150, ob6000, pio, xe3gf};
use crate::{BackendKind, Binding, Driver, Error, MaskOp, Operation, Result, TableEntry};
use alloc::sync::Arc;
use log::{info, warn};
use omnibook_io::Delay;

/// How a model reports and switches its fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanKind {
    /// The register holds the fan level (`0` = off). Turning the fan off
    /// means lowering the trip point `fot` to the temperature in `ctmp`
    /// until the EC stops the fan, then restoring the trip point.
    Staged { fot: u32, ctmp: u32 },
    /// A single status bit; the fan runs while the masked bit equals
    /// `running_when_set`.
    Bit { running_when_set: bool },
}

pub const FAN_TABLE: [TableEntry<FanKind>; 6] = [
    TableEntry::with(
        models!(XE3GF | TSP10),
        Operation::simple_byte(BackendKind::Ec, xe3gf::FSRD, 0)
            .with_steps(Some(MaskOp::Set(xe3gf::FAN_ON_MASK)), None),
        FanKind::Staged {
            fot: xe3gf::FOT,
            ctmp: xe3gf::CTMP,
        },
    ),
    TableEntry::with(
        models!(OB500),
        Operation::simple_byte(BackendKind::Pio, pio::OB500_GPO1, pio::OB500_FAN_OFF_MASK)
            .with_steps(
                Some(MaskOp::Clear(pio::OB500_FAN_ON_MASK)),
                Some(MaskOp::Set(pio::OB500_FAN_OFF_MASK)),
            ),
        FanKind::Bit {
            running_when_set: false,
        },
    ),
    TableEntry::with(
        models!(OB510),
        Operation::simple_byte(BackendKind::Pio, pio::OB510_GPO2, pio::OB510_FAN_OFF_MASK)
            .with_steps(
                Some(MaskOp::Clear(pio::OB510_FAN_ON_MASK)),
                Some(MaskOp::Set(pio::OB510_FAN_OFF_MASK)),
            ),
        FanKind::Bit {
            running_when_set: false,
        },
    ),
    TableEntry::with(
        models!(OB6000 | OB6100),
        Operation::simple_byte(BackendKind::Ec, ob6000::STA1, ob6000::FAN_MASK)
            .switching(ob6000::FAN_MASK),
        FanKind::Bit {
            running_when_set: true,
        },
    ),
    TableEntry::with(
        models!(OB4150 | AMILOD),
        Operation::simple_byte(BackendKind::Ec, ob4150::FAN, ob4150::FAN_MASK),
        FanKind::Bit {
            running_when_set: true,
        },
    ),
    TableEntry::with(
        models!(XE2),
        Operation::simple_byte(BackendKind::Pio, pio::OB500_GPO1, pio::XE2_FAN_MASK),
        FanKind::Bit {
            running_when_set: false,
        },
    ),
];

/// Fan state as last read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanStatus {
    /// `0` = off; staged fans report their level, others `1` when running.
    pub level: u8,
}

impl FanStatus {
    #[must_use]
    pub const fn is_running(self) -> bool {
        self.level != 0
    }
}

impl core::fmt::Display for FanStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = super::on_off(self.is_running());
        if self.level > 1 {
            writeln!(f, "Fan is {state} (level {})", self.level)
        } else {
            writeln!(f, "Fan is {state}")
        }
    }
}

/// Cooling fan.
pub struct Fan {
    binding: Binding,
    kind: FanKind,
    delay: Arc<dyn Delay>,
    off_attempts: u32,
}

impl Fan {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, kind) = driver.bind("fan", &FAN_TABLE)?;
        Ok(Self {
            binding,
            kind: *kind,
            delay: Arc::clone(driver.delay()),
            off_attempts: driver.config().fan_off_attempts,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> FanKind {
        self.kind
    }

    /// `false` if the model only reports the fan state.
    #[must_use]
    pub const fn is_controllable(&self) -> bool {
        let op = self.binding.operation();
        op.on.is_some() || op.off.is_some()
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn level(&self) -> Result<u8> {
        let raw = self.binding.read()?;
        Ok(match self.kind {
            FanKind::Staged { .. } => raw,
            FanKind::Bit { running_when_set } => u8::from((raw != 0) == running_when_set),
        })
    }

    /// # Errors
    ///
    /// As [`level`](Self::level).
    pub fn status(&self) -> Result<FanStatus> {
        Ok(FanStatus {
            level: self.level()?,
        })
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the model cannot switch the fan, backend
    /// errors otherwise.
    pub fn on(&self) -> Result<()> {
        if self.binding.operation().on.is_none() {
            return Err(Error::NoSuchDevice);
        }
        self.binding.apply_mask(true)?;
        info!("fan switched on");
        Ok(())
    }

    /// Stops the fan.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the model cannot switch the fan,
    /// [`Error::Timeout`] if a staged fan keeps running after every
    /// attempt (the trip point is restored either way), backend errors
    /// otherwise.
    pub fn off(&self) -> Result<()> {
        match self.kind {
            FanKind::Staged { fot, ctmp } => self.staged_off(fot, ctmp)?,
            FanKind::Bit { .. } => {
                if self.binding.operation().off.is_none() {
                    return Err(Error::NoSuchDevice);
                }
                self.binding.apply_mask(false)?;
            }
        }
        info!("fan switched off");
        Ok(())
    }

    fn staged_off(&self, fot: u32, ctmp: u32) -> Result<()> {
        if self.level()? == 0 {
            return Ok(());
        }

        let saved = self.binding.read_at(fot)?;
        let temperature = self.binding.read_at(ctmp)?;
        let outcome = self.lower_trip_point(fot, temperature);
        let restored = self.binding.write_at(fot, saved);
        outcome.and(restored)
    }

    fn lower_trip_point(&self, fot: u32, temperature: u8) -> Result<()> {
        for _ in 0..self.off_attempts {
            self.binding.write_at(fot, temperature)?;
            self.delay.mdelay(1);
            if self.level()? == 0 {
                return Ok(());
            }
        }
        warn!("fan still running after {} attempts", self.off_attempts);
        Err(Error::Timeout)
    }
}

impl core::fmt::Debug for Fan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fan")
            .field("binding", &self.binding)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
