use crate::bus::Await;
use crate::{Controller, LegacyBus, PortError};
use log::trace;

pub const EC_DATA_PORT: u16 = 0x62;
pub const EC_STATUS_PORT: u16 = 0x66;

/// Commands written to the EC command port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EcCommand {
    Read = 0x80,
    Write = 0x81,
    Query = 0x84,
}

impl LegacyBus {
    /// Reads EC register `addr`.
    ///
    /// # Errors
    ///
    /// [`PortError::Timeout`] if the EC stops answering mid-handshake.
    pub fn ec_read(&self, addr: u8) -> Result<u8, PortError> {
        let tx = self.begin();
        let ec = Controller::EC;
        self.send(&tx, ec, ec.status, EcCommand::Read as u8)?;
        self.send(&tx, ec, ec.data, addr)?;
        self.wait(&tx, ec, Await::OutputFull)?;
        let value = self.ports().inb(ec.data);
        drop(tx);

        trace!("EC read {addr:#04x} -> {value:#04x}");
        Ok(value)
    }

    /// Writes `value` to EC register `addr`.
    ///
    /// # Errors
    ///
    /// [`PortError::Timeout`] if the EC stops answering mid-handshake. The
    /// register is unchanged unless the final data byte went out.
    pub fn ec_write(&self, addr: u8, value: u8) -> Result<(), PortError> {
        let tx = self.begin();
        let ec = Controller::EC;
        self.send(&tx, ec, ec.status, EcCommand::Write as u8)?;
        self.send(&tx, ec, ec.data, addr)?;
        self.send(&tx, ec, ec.data, value)?;
        drop(tx);

        trace!("EC write {addr:#04x} <- {value:#04x}");
        Ok(())
    }

    /// Fetches the number of the oldest pending EC event (0 = none).
    ///
    /// # Errors
    ///
    /// [`PortError::Timeout`] if the EC does not answer.
    pub fn ec_query(&self) -> Result<u8, PortError> {
        let tx = self.begin();
        let ec = Controller::EC;
        self.send(&tx, ec, ec.status, EcCommand::Query as u8)?;
        self.wait(&tx, ec, Await::OutputFull)?;
        let event = self.ports().inb(ec.data);
        drop(tx);

        trace!("EC query -> {event:#04x}");
        Ok(event)
    }

    /// Reads a little-endian 16-bit value spanning `addr` and `addr + 1`.
    ///
    /// The two bytes are separate transactions; the EC may update the value
    /// in between.
    ///
    /// # Errors
    ///
    /// As [`ec_read`](Self::ec_read).
    pub fn ec_read16(&self, addr: u8) -> Result<u16, PortError> {
        let low = self.ec_read(addr)?;
        let high = self.ec_read(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([low, high]))
    }
}
