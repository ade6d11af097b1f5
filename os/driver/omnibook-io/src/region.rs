use alloc::sync::Arc;
use log::debug;

/// Reservation of I/O port ranges with the host.
pub trait IoRegions: Send + Sync {
    /// Reserves `len` ports starting at `start`. Returns `false` if any of
    /// them is owned by somebody else.
    fn request(&self, start: u16, len: u16) -> bool;

    /// Returns a range obtained from [`request`](Self::request).
    fn release(&self, start: u16, len: u16);
}

/// A host without port bookkeeping: every request succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unmanaged;

impl IoRegions for Unmanaged {
    fn request(&self, _start: u16, _len: u16) -> bool {
        true
    }

    fn release(&self, _start: u16, _len: u16) {}
}

/// An owned port range, released on drop.
pub struct RegionClaim {
    regions: Arc<dyn IoRegions>,
    start: u16,
    len: u16,
}

impl RegionClaim {
    /// Reserves `start..start + len`, or `None` if the host refuses.
    #[must_use]
    pub fn request(regions: &Arc<dyn IoRegions>, start: u16, len: u16) -> Option<Self> {
        if !regions.request(start, len) {
            debug!("I/O region {start:#06x}+{len} is busy");
            return None;
        }
        Some(Self {
            regions: Arc::clone(regions),
            start,
            len,
        })
    }

    #[must_use]
    pub const fn start(&self) -> u16 {
        self.start
    }

    #[must_use]
    pub const fn len(&self) -> u16 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for RegionClaim {
    fn drop(&mut self) {
        self.regions.release(self.start, self.len);
    }
}

impl core::fmt::Debug for RegionClaim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegionClaim")
            .field("start", &format_args!("{:#06x}", self.start))
            .field("len", &self.len)
            .finish()
    }
}
