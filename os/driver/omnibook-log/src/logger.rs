use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Prepended to every line.
pub const PREFIX: &str = "omnibook: ";

/// Receives one fully formatted line, including the trailing newline.
pub type Sink = fn(fmt::Arguments<'_>);

pub struct DriverLogger {
    max_level: LevelFilter,
    sink: Sink,
}

impl DriverLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter, sink: Sink) -> Self {
        Self { max_level, sink }
    }

    #[must_use]
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Registers this logger with the `log` facade.
    ///
    /// # Errors
    ///
    /// Fails if another logger was installed before.
    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl Log for DriverLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        (self.sink)(format_args!(
            "{PREFIX}[{}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}
