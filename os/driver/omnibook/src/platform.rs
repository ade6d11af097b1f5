//! Services the hosting environment hands to the driver.

use crate::Result;
use alloc::sync::Arc;
use omnibook_io::{Delay, IoRegions, PortIo, Unmanaged};
use omnibook_sync::{InterruptControl, NoInterrupts, NoSignals, TaskSignals};

/// The host's own, already synchronized, EC accessor.
pub trait HostEc: Send + Sync {
    /// # Errors
    ///
    /// Whatever the host reports; usually [`Error::Timeout`](crate::Error::Timeout).
    fn read(&self, addr: u8) -> Result<u8>;

    /// # Errors
    ///
    /// As [`read`](Self::read).
    fn write(&self, addr: u8, value: u8) -> Result<()>;
}

/// Opaque reference to a node in the host's ACPI namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcpiHandle(pub usize);

/// Result of an ACPI method evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcpiValue {
    /// The method returned nothing.
    None,
    Integer(u64),
    /// A buffer, package or string; the driver never needs those.
    Other,
}

/// The evaluation itself failed (missing method, AML error, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ACPI method execution failed")]
pub struct AcpiFault;

/// Access to the ACPI interpreter.
pub trait AcpiHost: Send + Sync {
    /// Resolves an absolute path such as `\_SB.PCI0.LPCB.EC0`.
    fn handle(&self, path: &str) -> Option<AcpiHandle>;

    fn has_method(&self, device: AcpiHandle, method: &str) -> bool;

    /// Evaluates `method` on `device` with at most one integer argument.
    ///
    /// # Errors
    ///
    /// [`AcpiFault`] if the interpreter rejects the call.
    fn evaluate(
        &self,
        device: AcpiHandle,
        method: &str,
        arg: Option<u64>,
    ) -> core::result::Result<AcpiValue, AcpiFault>;
}

/// A PCI function found through [`PciBus::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PciDevice {
    /// Host-side identity of the function.
    pub handle: usize,
    pub vendor: u16,
    pub device: u16,
}

/// PCI configuration access.
pub trait PciBus: Send + Sync {
    /// Looks up a function by ID and takes a reference on it.
    fn find(&self, vendor: u16, device: u16) -> Option<PciDevice>;

    /// # Errors
    ///
    /// Whatever the host reports when the function cannot be enabled.
    fn enable(&self, dev: &PciDevice) -> Result<()>;

    fn read_config_dword(&self, dev: &PciDevice, offset: u8) -> u32;

    /// Drops the reference taken by [`find`](Self::find).
    fn release(&self, dev: &PciDevice);
}

/// Raises a software SMI.
pub trait SmiTrap: Send + Sync {
    /// Writes `function` to `port` and returns `EAX` as left by the firmware.
    ///
    /// Called with interrupts masked. The firmware may clobber every general
    /// purpose register; implementations must preserve them.
    fn trap(&self, port: u16, function: u16) -> u32;
}

/// Software SMI through `out dx, ax`.
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
#[derive(Debug)]
pub struct X86SmiTrap {
    _private: (),
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl X86SmiTrap {
    /// # Safety
    ///
    /// The caller must run with I/O privilege and be sure the chipset
    /// routes writes to the SMI command port to firmware that returns.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl SmiTrap for X86SmiTrap {
    fn trap(&self, port: u16, function: u16) -> u32 {
        let eax: u32;
        // rbx and rbp cannot be named as operands, so they are saved by hand.
        unsafe {
            core::arch::asm!(
                "pushfq",
                "push rbx",
                "push rbp",
                "out dx, ax",
                "pop rbp",
                "pop rbx",
                "popfq",
                inout("eax") u32::from(function) => eax,
                inout("dx") port => _,
                out("ecx") _,
                out("esi") _,
                out("edi") _,
                out("r8") _,
                out("r9") _,
                out("r10") _,
                out("r11") _,
                out("r12") _,
                out("r13") _,
                out("r14") _,
                out("r15") _,
            );
        }
        eax
    }
}

/// Everything the driver needs from its host.
///
/// Only port I/O and delays are mandatory; the rest defaults to "absent" or
/// to the no-op implementations of the lower crates.
#[derive(Clone)]
pub struct Platform {
    pub ports: Arc<dyn PortIo>,
    pub delay: Arc<dyn Delay>,
    pub regions: Arc<dyn IoRegions>,
    pub irq: Arc<dyn InterruptControl>,
    pub signals: Arc<dyn TaskSignals>,
    pub host_ec: Option<Arc<dyn HostEc>>,
    pub acpi: Option<Arc<dyn AcpiHost>>,
    pub pci: Option<Arc<dyn PciBus>>,
    pub smi: Option<Arc<dyn SmiTrap>>,
}

impl Platform {
    #[must_use]
    pub fn new(ports: Arc<dyn PortIo>, delay: Arc<dyn Delay>) -> Self {
        Self {
            ports,
            delay,
            regions: Arc::new(Unmanaged),
            irq: Arc::new(NoInterrupts),
            signals: Arc::new(NoSignals),
            host_ec: None,
            acpi: None,
            pci: None,
            smi: None,
        }
    }

    #[must_use]
    pub fn with_regions(mut self, regions: Arc<dyn IoRegions>) -> Self {
        self.regions = regions;
        self
    }

    #[must_use]
    pub fn with_irq(mut self, irq: Arc<dyn InterruptControl>) -> Self {
        self.irq = irq;
        self
    }

    #[must_use]
    pub fn with_signals(mut self, signals: Arc<dyn TaskSignals>) -> Self {
        self.signals = signals;
        self
    }

    #[must_use]
    pub fn with_host_ec(mut self, host_ec: Arc<dyn HostEc>) -> Self {
        self.host_ec = Some(host_ec);
        self
    }

    #[must_use]
    pub fn with_acpi(mut self, acpi: Arc<dyn AcpiHost>) -> Self {
        self.acpi = Some(acpi);
        self
    }

    #[must_use]
    pub fn with_pci(mut self, pci: Arc<dyn PciBus>) -> Self {
        self.pci = Some(pci);
        self
    }

    #[must_use]
    pub fn with_smi(mut self, smi: Arc<dyn SmiTrap>) -> Self {
        self.smi = Some(smi);
        self
    }
}
