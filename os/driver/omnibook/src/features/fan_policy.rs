use crate::registers::xe3gf;
use crate::{BackendKind, Binding, Driver, Error, Operation, Result, TableEntry};
use core::fmt;
use log::info;

pub const FAN_POLICY_TABLE: [TableEntry; 1] = [TableEntry::new(
    models!(XE3GF),
    Operation::simple_byte(BackendKind::Ec, xe3gf::FOT, 0),
)];

/// Fan trip points in degrees Celsius: fan off, fan on, then levels 2 to 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanPolicy(pub [u8; FanPolicy::LEVELS]);

impl FanPolicy {
    pub const LEVELS: usize = 8;
    pub const MIN: u8 = 25;
    /// Highest allowed fan-off temperature.
    pub const FOT_MAX: u8 = 75;
    pub const MAX: u8 = 95;
    pub const DEFAULT: Self = Self([60, 75, 85, 90, 95, 95, 95, 95]);

    /// Checks the limits and that the trip points never decrease.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] on the first violation.
    pub fn validate(&self) -> Result<()> {
        let points = &self.0;
        if points[0] > Self::FOT_MAX {
            return Err(Error::InvalidArgument);
        }
        if points.iter().any(|&t| !(Self::MIN..=Self::MAX).contains(&t)) {
            return Err(Error::InvalidArgument);
        }
        if points.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

impl Default for FanPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fan off temperature:        {:2} C", self.0[0])?;
        writeln!(f, "Fan on temperature:         {:2} C", self.0[1])?;
        for (level, t) in self.0.iter().enumerate().skip(2) {
            writeln!(f, "Fan level {level:1} temperature:    {t:2} C")?;
        }
        writeln!(f, "Minimal temperature to set: {:2} C", Self::MIN)?;
        writeln!(f, "Maximal temperature to set: {:2} C", Self::MAX)
    }
}

/// The EC's fan trip point registers.
#[derive(Debug)]
pub struct FanPolicyControl {
    binding: Binding,
}

impl FanPolicyControl {
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("fan_policy", &FAN_POLICY_TABLE)?;
        Ok(Self { binding })
    }

    fn addresses(&self) -> impl Iterator<Item = u32> {
        let base = self.binding.operation().read_addr;
        (base..).take(FanPolicy::LEVELS)
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn get(&self) -> Result<FanPolicy> {
        let mut policy = [0; FanPolicy::LEVELS];
        for (slot, addr) in policy.iter_mut().zip(self.addresses()) {
            *slot = self.binding.read_at(addr)?;
        }
        Ok(FanPolicy(policy))
    }

    /// Validates and writes all trip points.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] before any write if the policy is out of
    /// bounds, backend errors otherwise.
    pub fn set(&self, policy: &FanPolicy) -> Result<()> {
        policy.validate()?;
        for (&t, addr) in policy.0.iter().zip(self.addresses()) {
            self.binding.write_at(addr, t)?;
        }
        info!("fan policy set");
        Ok(())
    }

    /// Restores the factory trip points.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn reset(&self) -> Result<()> {
        self.set(&FanPolicy::DEFAULT)
    }
}
