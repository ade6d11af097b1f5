use super::{Backend, ByteRead, ByteWrite, masked, port};
use crate::{BackendKind, Error, Operation, Result};
use alloc::sync::Arc;
use alloc::vec::Vec;
use log::{debug, error};
use omnibook_io::{IoRegions, PortIo, RegionClaim};
use omnibook_sync::{Kref, Mutex};

/// One reserved port, shared by every operation that uses it.
struct PortClaim {
    claim: RegionClaim,
    users: Kref,
}

/// Direct I/O port access.
///
/// Ports are reserved when an operation using them is bound and released
/// when the last such operation goes away. Traffic to ports that are not
/// reserved is refused.
pub struct PioBackend {
    ports: Arc<dyn PortIo>,
    regions: Arc<dyn IoRegions>,
    claims: Mutex<Vec<PortClaim>>,
}

impl PioBackend {
    #[must_use]
    pub fn new(ports: Arc<dyn PortIo>, regions: Arc<dyn IoRegions>) -> Self {
        Self {
            ports,
            regions,
            claims: Mutex::new(Vec::new()),
        }
    }

    fn claim(&self, addr: u16) -> Result<()> {
        let mut claims = self.claims.lock();
        if let Some(existing) = claims.iter().find(|c| c.claim.start() == addr) {
            existing.users.get();
            return Ok(());
        }

        claims.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        let Some(claim) = RegionClaim::request(&self.regions, addr, 1) else {
            error!("request of I/O port {addr:#06x} failed");
            return Err(Error::NoSuchDevice);
        };
        debug!("claimed I/O port {addr:#06x}");
        claims.push(PortClaim {
            claim,
            users: Kref::new(),
        });
        Ok(())
    }

    fn release(&self, addr: u16) {
        let mut claims = self.claims.lock();
        let Some(index) = claims.iter().position(|c| c.claim.start() == addr) else {
            return;
        };
        if claims[index].users.put() {
            claims.swap_remove(index);
            debug!("released I/O port {addr:#06x}");
        }
    }

    fn owned(&self, addr: u32) -> Result<u16> {
        let addr = port(addr)?;
        if self.claims.lock().iter().any(|c| c.claim.start() == addr) {
            Ok(addr)
        } else {
            Err(Error::InvalidArgument)
        }
    }
}

impl Backend for PioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pio
    }

    fn attach(&self, op: &Operation) -> Result<()> {
        let read = port(op.read_addr)?;
        let write = port(op.write_addr)?;
        self.claim(read)?;
        if write != read
            && let Err(err) = self.claim(write)
        {
            self.release(read);
            return Err(err);
        }
        Ok(())
    }

    fn detach(&self, op: &Operation) {
        let (Ok(read), Ok(write)) = (port(op.read_addr), port(op.write_addr)) else {
            return;
        };
        self.release(read);
        if write != read {
            self.release(write);
        }
    }

    fn byte_reader(&self) -> Option<&dyn ByteRead> {
        Some(self)
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        Some(self)
    }
}

impl ByteRead for PioBackend {
    fn byte_read(&self, op: &Operation) -> Result<u8> {
        let addr = self.owned(op.read_addr)?;
        Ok(masked(op, self.ports.inb(addr)))
    }
}

impl ByteWrite for PioBackend {
    fn byte_write(&self, op: &Operation, value: u8) -> Result<()> {
        let addr = self.owned(op.write_addr)?;
        self.ports.outb(addr, value);
        Ok(())
    }
}
