use crate::bus::Await;
use crate::{Controller, LegacyBus, PortError};
use log::trace;

pub const KBC_DATA_PORT: u16 = 0x60;
pub const KBC_STATUS_PORT: u16 = 0x64;

/// Vendor control command; the following data byte selects the function.
pub const KBC_CONTROL_CMD: u8 = 0x59;

impl LegacyBus {
    /// Sends `command` to the KBC command port followed by `data` on the
    /// data port, as one transaction.
    ///
    /// # Errors
    ///
    /// [`PortError::Timeout`] if the controller does not drain its input
    /// buffer.
    pub fn kbc_command(&self, command: u8, data: u8) -> Result<(), PortError> {
        let tx = self.begin();
        let kbc = Controller::KBC;
        self.send(&tx, kbc, kbc.status, command)?;
        self.wait(&tx, kbc, Await::InputEmpty)?;
        self.send(&tx, kbc, kbc.data, data)?;
        self.wait(&tx, kbc, Await::InputEmpty)?;
        drop(tx);

        trace!("KBC command {command:#04x} {data:#04x}");
        Ok(())
    }

    /// [`kbc_command`](Self::kbc_command) with the vendor control command.
    ///
    /// # Errors
    ///
    /// As [`kbc_command`](Self::kbc_command).
    pub fn kbc_control(&self, data: u8) -> Result<(), PortError> {
        self.kbc_command(KBC_CONTROL_CMD, data)
    }
}
