use crate::{ControllerStatus, Delay, PortError, PortIo};
use alloc::sync::Arc;
use log::trace;
use omnibook_sync::{InterruptControl, SpinIrqGuard, SpinLock};

/// Status polls per wait, one millisecond apart.
pub const DEFAULT_POLL_BUDGET: u32 = 250;

/// Port pair of an i8042-style handshake interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    pub name: &'static str,
    pub data: u16,
    pub status: u16,
}

impl Controller {
    pub const EC: Self = Self {
        name: "ec",
        data: crate::EC_DATA_PORT,
        status: crate::EC_STATUS_PORT,
    };

    pub const KBC: Self = Self {
        name: "i8042",
        data: crate::KBC_DATA_PORT,
        status: crate::KBC_STATUS_PORT,
    };
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Await {
    /// IBF clear: the controller accepted the previous byte.
    InputEmpty,
    /// OBF set: a reply byte is ready.
    OutputFull,
}

impl Await {
    const fn describe(self) -> &'static str {
        match self {
            Self::InputEmpty => "input buffer empty",
            Self::OutputFull => "output buffer full",
        }
    }

    fn satisfied(self, status: ControllerStatus) -> bool {
        match self {
            Self::InputEmpty => !status.input_full(),
            Self::OutputFull => status.output_full(),
        }
    }
}

/// The EC and KBC interfaces behind one transaction lock.
///
/// Transactions never interleave: each `ec_*`/`kbc_*` call holds the lock,
/// with interrupts masked, from its first status poll to its last transfer.
/// The lock is not re-entrant, so none of these methods may be called from
/// an [`InterruptControl`] or [`Delay`] implementation.
pub struct LegacyBus {
    ports: Arc<dyn PortIo>,
    delay: Arc<dyn Delay>,
    irq: Arc<dyn InterruptControl>,
    lock: SpinLock<()>,
    poll_budget: u32,
}

impl LegacyBus {
    #[must_use]
    pub fn new(
        ports: Arc<dyn PortIo>,
        delay: Arc<dyn Delay>,
        irq: Arc<dyn InterruptControl>,
    ) -> Self {
        Self {
            ports,
            delay,
            irq,
            lock: SpinLock::new(()),
            poll_budget: DEFAULT_POLL_BUDGET,
        }
    }

    /// Overrides the number of status polls per wait (at least one).
    #[must_use]
    pub fn with_poll_budget(mut self, polls: u32) -> Self {
        self.poll_budget = polls.max(1);
        self
    }

    #[must_use]
    pub const fn poll_budget(&self) -> u32 {
        self.poll_budget
    }

    #[must_use]
    pub fn ports(&self) -> &Arc<dyn PortIo> {
        &self.ports
    }

    #[must_use]
    pub fn delay(&self) -> &Arc<dyn Delay> {
        &self.delay
    }

    /// Starts a transaction.
    pub(crate) fn begin(&self) -> SpinIrqGuard<'_, ()> {
        self.lock.lock_irq(&*self.irq)
    }

    /// Polls `ctl`'s status register until `want` holds.
    ///
    /// Must be called inside a transaction; the guard parameter proves it.
    pub(crate) fn wait(
        &self,
        _tx: &SpinIrqGuard<'_, ()>,
        ctl: Controller,
        want: Await,
    ) -> Result<(), PortError> {
        let mut last = ControllerStatus::new();
        for _ in 0..self.poll_budget {
            last = ControllerStatus::from_bits(self.ports.inb(ctl.status));
            if want.satisfied(last) {
                return Ok(());
            }
            self.delay.mdelay(1);
        }

        trace!("{}: giving up on {}, status {last:?}", ctl.name, want.describe());
        Err(PortError::Timeout {
            controller: ctl.name,
            condition: want.describe(),
            waited_ms: self.poll_budget,
        })
    }

    /// Writes `value` to `port` once the input buffer has drained.
    pub(crate) fn send(
        &self,
        tx: &SpinIrqGuard<'_, ()>,
        ctl: Controller,
        port: u16,
        value: u8,
    ) -> Result<(), PortError> {
        self.wait(tx, ctl, Await::InputEmpty)?;
        self.ports.outb(port, value);
        Ok(())
    }
}
