use crate::PortIo;
use alloc::sync::Arc;

/// Busy-wait delays.
///
/// Used between status polls; the callers may hold a spinlock with
/// interrupts masked, so implementations must not sleep or schedule.
pub trait Delay: Send + Sync {
    fn mdelay(&self, ms: u32);
}

/// Delays by writing to the POST diagnostic port `0x80`.
///
/// Each write costs roughly one microsecond on ISA-compatible chipsets, which
/// is good enough for handshake timeouts but not for timekeeping.
pub struct PortDelay {
    ports: Arc<dyn PortIo>,
}

impl PortDelay {
    /// Unused port whose writes only cost bus time.
    pub const POST_PORT: u16 = 0x80;

    /// Port writes per millisecond.
    pub const WRITES_PER_MS: u32 = 1000;

    #[must_use]
    pub fn new(ports: Arc<dyn PortIo>) -> Self {
        Self { ports }
    }
}

impl Delay for PortDelay {
    fn mdelay(&self, ms: u32) {
        for _ in 0..ms.saturating_mul(Self::WRITES_PER_MS) {
            self.ports.outb(Self::POST_PORT, 0);
        }
    }
}
