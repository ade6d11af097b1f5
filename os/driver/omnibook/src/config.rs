use crate::{Error, ModelMask, Result};

/// Driver configuration, fixed for the lifetime of a [`Driver`](crate::Driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// The laptop family the driver targets.
    pub model: ModelMask,
    /// Set when `model` was supplied by the user instead of detected.
    pub forced: bool,
    /// Route EC traffic through the host's own EC driver when one is
    /// available instead of the raw port handshake.
    pub prefer_host_ec: bool,
    /// Upper bound on the steps of the staged fan shutdown.
    pub fan_off_attempts: u32,
    /// Reject operation tables with overlapping entries.
    pub check_tables: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(ModelMask::empty())
    }
}

impl DriverConfig {
    pub const DEFAULT_FAN_OFF_ATTEMPTS: u32 = 250;

    #[must_use]
    pub const fn new(model: ModelMask) -> Self {
        Self {
            model,
            forced: false,
            prefer_host_ec: true,
            fan_off_attempts: Self::DEFAULT_FAN_OFF_ATTEMPTS,
            check_tables: cfg!(debug_assertions),
        }
    }

    /// A configuration whose model was chosen by the user.
    #[must_use]
    pub const fn forced(model: ModelMask) -> Self {
        let mut config = Self::new(model);
        config.forced = true;
        config
    }

    /// Parses the historical numeric `ectype` parameter (`1..=14`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for `0` and out-of-range indices.
    pub fn from_legacy_ectype(index: u32) -> Result<Self> {
        match ModelMask::from_legacy_index(index) {
            Some(model) if !model.is_empty() => Ok(Self::forced(model)),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Parses a family name such as `"TSM40"`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for unknown names.
    pub fn from_model_name(name: &str) -> Result<Self> {
        ModelMask::from_name(name.trim())
            .map(Self::forced)
            .ok_or(Error::InvalidArgument)
    }

    #[must_use]
    pub const fn with_fan_off_attempts(mut self, attempts: u32) -> Self {
        self.fan_off_attempts = attempts;
        self
    }

    #[must_use]
    pub const fn with_host_ec(mut self, prefer: bool) -> Self {
        self.prefer_host_ec = prefer;
        self
    }

    #[must_use]
    pub const fn with_table_checks(mut self, check: bool) -> Self {
        self.check_tables = check;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn legacy_ectype_selects_forced_model() {
        let config = DriverConfig::from_legacy_ectype(13).unwrap();
        assert_eq!(config.model, ModelMask::TSM40);
        assert!(config.forced);
        assert_eq!(DriverConfig::from_legacy_ectype(0), Err(Error::InvalidArgument));
        assert_eq!(DriverConfig::from_legacy_ectype(99), Err(Error::InvalidArgument));
    }

    #[test]
    fn model_names_parse() {
        assert_eq!(DriverConfig::from_model_name(" XE3GF\n").unwrap().model, ModelMask::XE3GF);
        assert_eq!(DriverConfig::from_model_name("XE9"), Err(Error::InvalidArgument));
    }
}
