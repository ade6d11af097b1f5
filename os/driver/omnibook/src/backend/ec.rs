use super::{Backend, ByteRead, ByteWrite, DisplayControl, masked, register};
use crate::platform::HostEc;
use crate::{BackendKind, DisplayFlags, Operation, Reading, Result};
use alloc::sync::Arc;
use log::trace;
use omnibook_io::LegacyBus;

/// Embedded controller registers.
///
/// Goes through the host's EC driver when one was handed over, otherwise
/// through the raw handshake on [`LegacyBus`].
pub struct EcBackend {
    bus: Arc<LegacyBus>,
    host: Option<Arc<dyn HostEc>>,
}

impl EcBackend {
    #[must_use]
    pub fn new(bus: Arc<LegacyBus>, host: Option<Arc<dyn HostEc>>) -> Self {
        Self { bus, host }
    }

    fn read_raw(&self, addr: u8) -> Result<u8> {
        match &self.host {
            Some(host) => host.read(addr),
            None => Ok(self.bus.ec_read(addr)?),
        }
    }

    fn write_raw(&self, addr: u8, value: u8) -> Result<()> {
        match &self.host {
            Some(host) => host.write(addr, value),
            None => Ok(self.bus.ec_write(addr, value)?),
        }
    }
}

impl Backend for EcBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Ec
    }

    fn byte_reader(&self) -> Option<&dyn ByteRead> {
        Some(self)
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        Some(self)
    }

    fn display(&self) -> Option<&dyn DisplayControl> {
        Some(self)
    }
}

impl ByteRead for EcBackend {
    fn byte_read(&self, op: &Operation) -> Result<u8> {
        let raw = self.read_raw(register(op.read_addr)?)?;
        Ok(masked(op, raw))
    }
}

impl ByteWrite for EcBackend {
    fn byte_write(&self, op: &Operation, value: u8) -> Result<()> {
        self.write_raw(register(op.write_addr)?, value)
    }
}

/// The EC only knows whether an external monitor is plugged in.
impl DisplayControl for EcBackend {
    fn display_get(&self, op: &Operation) -> Result<Reading<DisplayFlags>> {
        let sense = self.byte_read(op)?;
        trace!("EC display sense {sense:#04x}");
        let state = if sense == 0 {
            DisplayFlags::empty()
        } else {
            DisplayFlags::CRT_DET
        };
        Ok(Reading::new(state, DisplayFlags::CRT_DET))
    }
}
