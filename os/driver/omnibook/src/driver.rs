use crate::arena::{BackendState, Slot};
use crate::backend::{
    AcpiBackend, Backend, CdiBackend, EcBackend, KbcBackend, PioBackend, SmiBackend,
    TOSHIBA_BLUETOOTH_HID,
};
use crate::platform::{AcpiHandle, Platform};
use crate::table::{self, TableEntry};
use crate::{BackendKind, Binding, DriverConfig, Error, ModelMask, Operation, Result};
use alloc::sync::Arc;
use log::{debug, info, warn};
use omnibook_io::{Delay, LegacyBus};
use omnibook_sync::TaskSignals;

/// The driver context: configuration plus one slot per backend.
///
/// Features bind their operations through [`Driver::bind`]; the bindings
/// keep the backends alive independently of the `Driver` value.
pub struct Driver {
    config: DriverConfig,
    delay: Arc<dyn Delay>,
    signals: Arc<dyn TaskSignals>,
    slots: [Arc<Slot>; BackendKind::COUNT],
    acpi: Arc<AcpiBackend>,
}

impl Driver {
    #[must_use]
    pub fn new(config: DriverConfig, platform: Platform) -> Self {
        if config.forced {
            warn!("forced model {}: {}", config.model.legacy_index(), config.model.describe());
        } else {
            info!("model {}", config.model.describe());
        }

        let bus = Arc::new(LegacyBus::new(
            Arc::clone(&platform.ports),
            Arc::clone(&platform.delay),
            Arc::clone(&platform.irq),
        ));
        let host_ec = platform.host_ec.clone().filter(|_| config.prefer_host_ec);
        let acpi = Arc::new(AcpiBackend::new(
            platform.acpi.clone(),
            Arc::clone(&platform.signals),
        ));

        let backends: [Arc<dyn Backend>; BackendKind::COUNT] = [
            Arc::new(EcBackend::new(Arc::clone(&bus), host_ec)),
            Arc::new(PioBackend::new(
                Arc::clone(&platform.ports),
                Arc::clone(&platform.regions),
            )),
            Arc::new(KbcBackend::new(bus)),
            acpi.clone(),
            Arc::new(SmiBackend::new(config.model, &platform)),
            Arc::new(CdiBackend::new(
                Arc::clone(&platform.ports),
                Arc::clone(&platform.regions),
                Arc::clone(&platform.irq),
            )),
        ];
        debug_assert!(
            backends
                .iter()
                .zip(BackendKind::ALL)
                .all(|(backend, kind)| backend.kind() == kind)
        );

        Self {
            config,
            delay: platform.delay,
            signals: platform.signals,
            slots: backends.map(|backend| Arc::new(Slot::new(backend))),
            acpi,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[must_use]
    pub const fn model(&self) -> ModelMask {
        self.config.model
    }

    #[must_use]
    pub fn delay(&self) -> &Arc<dyn Delay> {
        &self.delay
    }

    #[must_use]
    pub fn backend_state(&self, kind: BackendKind) -> BackendState {
        self.slots[kind.index()].state()
    }

    /// The entry of `table` for the configured model.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if no entry applies; [`Error::InvalidArgument`]
    /// if table checks are enabled and the table has overlapping entries.
    pub fn lookup<'t, E>(
        &self,
        feature: &str,
        table: &'t [TableEntry<E>],
    ) -> Result<&'t TableEntry<E>> {
        if self.config.check_tables && !table::check(feature, table) {
            return Err(Error::InvalidArgument);
        }
        table::find(table, self.config.model).ok_or_else(|| {
            debug!("{feature}: nothing for {:?}", self.config.model);
            Error::NoSuchDevice
        })
    }

    /// Binds the entry of `table` for the configured model.
    ///
    /// Returns the binding together with the entry's extra data.
    ///
    /// # Errors
    ///
    /// As [`lookup`](Self::lookup) and [`bind_operation`](Self::bind_operation).
    pub fn bind<'t, E>(
        &self,
        feature: &str,
        table: &'t [TableEntry<E>],
    ) -> Result<(Binding, &'t E)> {
        let entry = self.lookup(feature, table)?;
        let binding = self.bind_operation(entry.op)?;
        debug!("{feature}: bound to {}", entry.op.backend);
        Ok((binding, &entry.extra))
    }

    /// Initializes the operation's backend if needed and binds `op` to it.
    ///
    /// # Errors
    ///
    /// The backend's probe or attach error, [`Error::Interrupted`] if a
    /// signal arrived while waiting for another probe.
    pub fn bind_operation(&self, op: Operation) -> Result<Binding> {
        let slot = &self.slots[op.backend.index()];
        slot.acquire(&*self.signals)?;
        Binding::attach(Arc::clone(slot), op)
    }

    /// Hook for the host's ACPI bus: a device with hardware ID `hid` appeared.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] for devices the driver does not handle.
    pub fn acpi_device_added(&self, hid: &str, device: AcpiHandle) -> Result<()> {
        if hid != TOSHIBA_BLUETOOTH_HID {
            return Err(Error::NoSuchDevice);
        }
        self.acpi.bluetooth_added(device)
    }

    /// Hook for the host's ACPI bus: `device` went away.
    pub fn acpi_device_removed(&self, device: AcpiHandle) {
        self.acpi.bluetooth_removed(device);
    }
}
