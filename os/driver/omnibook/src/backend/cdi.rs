use super::{Backend, ByteRead, ByteWrite, masked, register};
use crate::registers::cdi::{DATA_PORT, FN_INDEX, INDEX_PORT};
use crate::{BackendKind, Error, Operation, Result};
use alloc::sync::Arc;
use log::{debug, error};
use omnibook_io::{IoRegions, PortIo, RegionClaim};
use omnibook_sync::{InterruptControl, Mutex, SpinLock};

/// Byte-wide index/data pair of the Compal embedded controller.
///
/// Index and data accesses form one transaction under a spinlock with
/// interrupts masked.
pub struct CdiBackend {
    ports: Arc<dyn PortIo>,
    regions: Arc<dyn IoRegions>,
    irq: Arc<dyn InterruptControl>,
    lock: SpinLock<()>,
    region: Mutex<Option<RegionClaim>>,
}

impl CdiBackend {
    #[must_use]
    pub fn new(
        ports: Arc<dyn PortIo>,
        regions: Arc<dyn IoRegions>,
        irq: Arc<dyn InterruptControl>,
    ) -> Self {
        Self {
            ports,
            regions,
            irq,
            lock: SpinLock::new(()),
            region: Mutex::new(None),
        }
    }

    fn read_index(&self, index: u8) -> u8 {
        let _tx = self.lock.lock_irq(&*self.irq);
        self.ports.outb(INDEX_PORT, index);
        self.ports.inb(DATA_PORT)
    }

    fn write_index(&self, index: u8, value: u8) {
        let _tx = self.lock.lock_irq(&*self.irq);
        self.ports.outb(INDEX_PORT, index);
        self.ports.outb(DATA_PORT, value);
    }
}

impl Backend for CdiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cdi
    }

    fn probe(&self) -> Result<()> {
        let mut region = self.region.lock();
        let Some(claim) = RegionClaim::request(&self.regions, INDEX_PORT, 2) else {
            error!("request of the CDI I/O region failed");
            return Err(Error::NoSuchDevice);
        };

        // A floating bus reads all ones.
        let probe = self.read_index(register(FN_INDEX)?);
        debug!("CDI probe read {probe:#04x}");
        if probe == 0xff {
            error!("no Compal EC behind {INDEX_PORT:#05x}");
            return Err(Error::NoSuchDevice);
        }

        *region = Some(claim);
        Ok(())
    }

    fn dispose(&self) {
        self.region.lock().take();
    }

    fn byte_reader(&self) -> Option<&dyn ByteRead> {
        Some(self)
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        Some(self)
    }
}

impl ByteRead for CdiBackend {
    fn byte_read(&self, op: &Operation) -> Result<u8> {
        let value = self.read_index(register(op.read_addr)?);
        Ok(masked(op, value))
    }
}

impl ByteWrite for CdiBackend {
    fn byte_write(&self, op: &Operation, value: u8) -> Result<()> {
        self.write_index(register(op.write_addr)?, value);
        Ok(())
    }
}
