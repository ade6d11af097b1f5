mod common;

use common::{FakeAcpi, Rig};
use omnibook::registers::cdi;
use omnibook::{
    AcpiFault, AcpiHandle, AcpiHost, AcpiValue, BackendKind, BackendState, DriverConfig, Error,
    ModelMask, Operation,
};
use omnibook_sync::TaskSignals;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn ec_op() -> Operation {
    Operation::simple_byte(BackendKind::Ec, 0xa3, 0x20)
}

#[test]
fn backends_start_uninitialized() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::XE3GF);
    for kind in BackendKind::ALL {
        assert_eq!(driver.backend_state(kind), BackendState::Uninitialized);
    }
}

#[test]
fn bindings_count_users_and_last_one_disposes() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::XE3GF);

    let first = driver.bind_operation(ec_op()).unwrap();
    let second = driver.bind_operation(ec_op()).unwrap();
    assert_eq!(driver.backend_state(BackendKind::Ec), BackendState::Ready { users: 2 });

    drop(first);
    assert_eq!(driver.backend_state(BackendKind::Ec), BackendState::Ready { users: 1 });
    drop(second);
    assert_eq!(driver.backend_state(BackendKind::Ec), BackendState::Disposed);
}

#[test]
fn disposed_backend_is_probed_again() {
    let rig = Rig::new();
    rig.hw.with(|s| s.cdi[cdi::FN_INDEX as usize] = 0x00);
    let driver = rig.driver(ModelMask::TSM30X);
    let op = Operation::bare(BackendKind::Cdi).reading(cdi::LCD_READ);

    let binding = driver.bind_operation(op).unwrap();
    assert!(rig.regions.owns(cdi::INDEX_PORT));
    drop(binding);
    assert_eq!(driver.backend_state(BackendKind::Cdi), BackendState::Disposed);
    assert!(!rig.regions.owns(cdi::INDEX_PORT));

    let _binding = driver.bind_operation(op).unwrap();
    assert_eq!(driver.backend_state(BackendKind::Cdi), BackendState::Ready { users: 1 });
    assert!(rig.regions.owns(cdi::INDEX_PORT));
}

#[test]
fn failed_probe_is_sticky() {
    let rig = Rig::new();
    rig.hw.with(|s| s.cdi[cdi::FN_INDEX as usize] = 0xff);
    let driver = rig.driver(ModelMask::TSM30X);
    let op = Operation::bare(BackendKind::Cdi).reading(cdi::LCD_READ);

    assert_eq!(driver.bind_operation(op).unwrap_err(), Error::NoSuchDevice);
    assert_eq!(driver.backend_state(BackendKind::Cdi), BackendState::Failed);
    assert!(!rig.regions.owns(cdi::INDEX_PORT), "claim given back on failure");

    // A working controller later on does not matter any more.
    rig.hw.with(|s| s.cdi[cdi::FN_INDEX as usize] = 0x00);
    assert_eq!(driver.bind_operation(op).unwrap_err(), Error::NoSuchDevice);
}

#[test]
fn failed_backend_does_not_affect_others() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::XE3GF);

    assert_eq!(
        driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap_err(),
        Error::NoSuchDevice
    );
    assert_eq!(driver.backend_state(BackendKind::Acpi), BackendState::Failed);
    assert!(driver.bind_operation(ec_op()).is_ok());
}

#[test]
fn concurrent_binds_probe_once_and_count_every_user() {
    const THREADS: usize = 8;
    let rig = Rig::new();
    rig.hw.with(|s| s.cdi[cdi::FN_INDEX as usize] = 0x00);
    let driver = Arc::new(rig.driver(ModelMask::TSM30X));
    let barrier = Arc::new(Barrier::new(THREADS));
    let op = Operation::bare(BackendKind::Cdi).reading(cdi::LCD_READ);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let driver = Arc::clone(&driver);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                driver.bind_operation(op).unwrap()
            })
        })
        .collect();
    let bindings: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        driver.backend_state(BackendKind::Cdi),
        BackendState::Ready { users: THREADS }
    );
    // The ledger refuses a second claim of the same range, so one probe ran.
    assert_eq!(rig.regions.owned.lock().unwrap().len(), 1);

    drop(bindings);
    assert_eq!(driver.backend_state(BackendKind::Cdi), BackendState::Disposed);
    assert!(rig.regions.owned.lock().unwrap().is_empty());
}

#[test]
fn binding_survives_the_driver() {
    let rig = Rig::new();
    rig.hw.with(|s| s.ec[0xa3] = 0x20);
    let driver = rig.driver(ModelMask::XE3GF);

    let binding = driver.bind_operation(ec_op()).unwrap();
    drop(driver);
    assert_eq!(binding.read(), Ok(0x20));
}

/// Signal source the test raises and clears by hand.
#[derive(Default)]
struct Pending(AtomicBool);

impl TaskSignals for Pending {
    fn signal_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parks the first namespace lookup until the test lets it go.
struct GatedAcpi {
    inner: Arc<FakeAcpi>,
    gated: AtomicBool,
    entered: Barrier,
    leave: Barrier,
}

impl AcpiHost for GatedAcpi {
    fn handle(&self, path: &str) -> Option<AcpiHandle> {
        if !self.gated.swap(true, Ordering::SeqCst) {
            self.entered.wait();
            self.leave.wait();
        }
        self.inner.handle(path)
    }

    fn has_method(&self, device: AcpiHandle, method: &str) -> bool {
        self.inner.has_method(device, method)
    }

    fn evaluate(
        &self,
        device: AcpiHandle,
        method: &str,
        arg: Option<u64>,
    ) -> Result<AcpiValue, AcpiFault> {
        self.inner.evaluate(device, method, arg)
    }
}

#[test]
fn signal_while_waiting_for_probe_is_not_sticky() {
    let rig = Rig::new();
    let acpi = Arc::new(GatedAcpi {
        inner: FakeAcpi::with_ec(&[]),
        gated: AtomicBool::new(false),
        entered: Barrier::new(2),
        leave: Barrier::new(2),
    });
    let signals = Arc::new(Pending::default());
    let platform = rig
        .platform()
        .with_acpi(acpi.clone())
        .with_signals(signals.clone());
    let driver = Arc::new(rig.driver_with(DriverConfig::new(ModelMask::TSM30X), platform));
    let op = Operation::bare(BackendKind::Acpi);

    let prober = {
        let driver = Arc::clone(&driver);
        thread::spawn(move || driver.bind_operation(op))
    };
    acpi.entered.wait();
    assert_eq!(driver.backend_state(BackendKind::Acpi), BackendState::Initializing);

    signals.0.store(true, Ordering::SeqCst);
    assert_eq!(driver.bind_operation(op).err(), Some(Error::Interrupted));
    signals.0.store(false, Ordering::SeqCst);

    acpi.leave.wait();
    let first = prober.join().unwrap().unwrap();
    let second = driver.bind_operation(op).unwrap();
    assert_eq!(driver.backend_state(BackendKind::Acpi), BackendState::Ready { users: 2 });
    drop((first, second));
}
