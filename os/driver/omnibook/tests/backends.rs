mod common;

use common::{BT0, FakeAcpi, FakeFirmware, FakePci, ICH4M, Rig};
use omnibook::registers::kbc;
use omnibook::{
    AcpiValue, BackendKind, BackendState, DisplayFlags, DriverConfig, Error, HostEc,
    HotkeyFlags, ModelMask, Operation, Result, WirelessFlags,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn pio_ports_are_shared_between_bindings() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::OB500);
    let op = Operation::simple_byte(BackendKind::Pio, 0x8034, 0x40).switching(0x40);

    let first = driver.bind_operation(op).unwrap();
    let second = driver.bind_operation(op).unwrap();
    assert_eq!(*rig.regions.owned.lock().unwrap(), [(0x8034, 1)]);

    drop(first);
    assert!(rig.regions.owns(0x8034));
    drop(second);
    assert!(!rig.regions.owns(0x8034));
}

#[test]
fn pio_claims_read_and_write_ports() {
    let rig = Rig::new();
    rig.hw.with(|s| {
        s.ports.insert(0x1000, 0x81);
    });
    let driver = rig.driver(ModelMask::OB510);
    let op = Operation::bare(BackendKind::Pio).reading(0x1000).writing(0x1001);

    let binding = driver.bind_operation(op).unwrap();
    assert!(rig.regions.owns(0x1000) && rig.regions.owns(0x1001));
    assert_eq!(binding.read(), Ok(0x81));
    binding.write(0x42).unwrap();
    rig.hw.with(|s| assert_eq!(s.port_writes, [(0x1001, 0x42)]));

    drop(binding);
    assert!(rig.regions.owned.lock().unwrap().is_empty());
}

#[test]
fn pio_claim_conflict_rolls_back() {
    let rig = Rig::new();
    rig.regions.denied.lock().unwrap().push(0x1001);
    let driver = rig.driver(ModelMask::OB510);
    let op = Operation::bare(BackendKind::Pio).reading(0x1000).writing(0x1001);

    assert_eq!(driver.bind_operation(op).unwrap_err(), Error::NoSuchDevice);
    assert!(!rig.regions.owns(0x1000), "read port given back");
    assert_eq!(driver.backend_state(BackendKind::Pio), BackendState::Disposed);
}

#[test]
fn pio_off_step_on_gpo_register() {
    let rig = Rig::new();
    rig.hw.with(|s| {
        s.ports.insert(0x8034, 0xf7);
    });
    let driver = rig.driver(ModelMask::OB500);
    let op = Operation::simple_byte(BackendKind::Pio, 0x8034, 0x40).switching(0x40);

    let binding = driver.bind_operation(op).unwrap();
    binding.apply_mask(false).unwrap();
    assert_eq!(binding.read_at(0x8034), Ok(0xb7));
}

#[test]
fn kbc_sends_vendor_commands() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::XE3GF);
    let op = Operation::command(BackendKind::Kbc, kbc::ONETOUCH_ENABLE, kbc::ONETOUCH_DISABLE);

    let binding = driver.bind_operation(op).unwrap();
    assert_eq!(binding.hotkeys_set(HotkeyFlags::ONETOUCH), Ok(HotkeyFlags::ONETOUCH));
    assert_eq!(binding.hotkeys_set(HotkeyFlags::empty()), Ok(HotkeyFlags::ONETOUCH));
    assert_eq!(binding.read(), Err(Error::NoSuchDevice), "write-only backend");
    rig.hw.with(|s| assert_eq!(s.kbc, [kbc::ONETOUCH_ENABLE, kbc::ONETOUCH_DISABLE]));
}

#[derive(Default)]
struct HostController {
    reads: AtomicU32,
    writes: Mutex<Vec<(u8, u8)>>,
}

impl HostEc for HostController {
    fn read(&self, _addr: u8) -> Result<u8> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(0x20)
    }

    fn write(&self, addr: u8, value: u8) -> Result<()> {
        self.writes.lock().unwrap().push((addr, value));
        Ok(())
    }
}

#[test]
fn ec_prefers_the_host_controller() {
    let rig = Rig::new();
    let host = Arc::new(HostController::default());
    let driver = rig.driver_with(
        DriverConfig::new(ModelMask::XE3GF),
        rig.platform().with_host_ec(host.clone()),
    );

    let binding = driver
        .bind_operation(Operation::simple_byte(BackendKind::Ec, 0xa3, 0x20))
        .unwrap();
    assert_eq!(binding.read(), Ok(0x20));
    binding.write(0x01).unwrap();

    assert_eq!(host.reads.load(Ordering::SeqCst), 1);
    assert_eq!(*host.writes.lock().unwrap(), [(0xa3, 0x01)]);
    rig.hw.with(|s| assert!(s.ec_writes.is_empty()));
}

#[test]
fn ec_uses_ports_when_host_is_declined() {
    let rig = Rig::new();
    let host = Arc::new(HostController::default());
    let driver = rig.driver_with(
        DriverConfig::new(ModelMask::XE3GF).with_host_ec(false),
        rig.platform().with_host_ec(host.clone()),
    );

    let binding = driver
        .bind_operation(Operation::simple_byte(BackendKind::Ec, 0xa5, 0))
        .unwrap();
    binding.write(60).unwrap();
    assert_eq!(host.reads.load(Ordering::SeqCst), 0);
    rig.hw.with(|s| assert_eq!(s.ec_writes, [(0xa5, 60)]));
}

#[test]
fn ec_display_reports_external_monitor() {
    let rig = Rig::new();
    rig.hw.with(|s| s.ec[0x9c] = 0x40);
    let driver = rig.driver(ModelMask::XE3GF);

    let binding = driver
        .bind_operation(Operation::simple_byte(BackendKind::Ec, 0x9c, 0x40))
        .unwrap();
    let reading = binding.display_get().unwrap();
    assert_eq!(reading.get(DisplayFlags::CRT_DET), Some(true));
    assert_eq!(reading.get(DisplayFlags::LCD_ON), None);
    assert_eq!(binding.display_set(DisplayFlags::LCD_ON), Err(Error::NoSuchDevice));
}

fn acpi_rig(acpi: &Arc<FakeAcpi>) -> (Rig, omnibook::Driver) {
    let rig = Rig::new();
    let driver = rig.driver_with(
        DriverConfig::new(ModelMask::TSM30X),
        rig.platform().with_acpi(acpi.clone()),
    );
    (rig, driver)
}

#[test]
fn acpi_antenna_methods_carry_both_radios() {
    let acpi = FakeAcpi::with_ec(&[
        ("ANTR", AcpiValue::Integer(0x4 | 0x8 | 0x1)),
        ("ANTW", AcpiValue::None),
    ]);
    let (_rig, driver) = acpi_rig(&acpi);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap();

    let reading = binding.wireless_get().unwrap();
    assert_eq!(
        reading.state,
        WirelessFlags::WIFI_EX | WirelessFlags::WIFI_STA | WirelessFlags::BT_EX
    );
    assert_eq!(reading.get(WirelessFlags::KILLSWITCH), Some(false));

    binding.wireless_set(WirelessFlags::BT_STA).unwrap();
    assert_eq!(acpi.calls().last(), Some(&("ANTW", Some(0x2))));
}

#[test]
fn acpi_display_modes() {
    let acpi = FakeAcpi::with_ec(&[
        ("DOSS", AcpiValue::Integer(0x1 | 0x10 | 0x20)),
        ("DOSW", AcpiValue::None),
    ]);
    let (_rig, driver) = acpi_rig(&acpi);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap();

    assert_eq!(
        binding.display_get().unwrap().state,
        DisplayFlags::LCD_ON | DisplayFlags::LCD_DET | DisplayFlags::CRT_DET
    );
    binding.display_set(DisplayFlags::LCD_ON | DisplayFlags::CRT_ON).unwrap();
    assert_eq!(acpi.calls().last(), Some(&("DOSW", Some(3))));
    assert_eq!(
        binding.display_set(DisplayFlags::CRT_DET),
        Err(Error::InvalidArgument)
    );
}

#[test]
fn acpi_method_failure_is_io_error() {
    let acpi = FakeAcpi::with_ec(&[("DOSS", AcpiValue::Integer(0))]);
    acpi.state.lock().unwrap().failing.push("DOSS");
    let (_rig, driver) = acpi_rig(&acpi);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap();

    assert_eq!(
        binding.display_get(),
        Err(Error::Io("ACPI method execution failed"))
    );
}

#[test]
fn acpi_without_ec_device_fails() {
    let acpi = Arc::new(FakeAcpi::default());
    let (_rig, driver) = acpi_rig(&acpi);
    assert_eq!(
        driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap_err(),
        Error::NoSuchDevice
    );
}

#[test]
fn toshiba_bluetooth_device_stands_in_for_antenna_methods() {
    let acpi = FakeAcpi::with_ec(&[]);
    acpi.define(BT0, "BTST", AcpiValue::Integer(0x80 | 0x40 | 0x01));
    for method in ["BTPO", "BTPF", "AUSB", "DUSB"] {
        acpi.define(BT0, method, AcpiValue::None);
    }
    let (_rig, driver) = acpi_rig(&acpi);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Acpi)).unwrap();

    assert_eq!(binding.wireless_get(), Err(Error::NoSuchDevice));
    assert_eq!(driver.acpi_device_added("PNP0C09", BT0), Err(Error::NoSuchDevice));
    driver.acpi_device_added("TOS6205", BT0).unwrap();
    assert_eq!(driver.acpi_device_added("TOS6205", BT0), Err(Error::Busy));

    let reading = binding.wireless_get().unwrap();
    assert_eq!(reading.get(WirelessFlags::BT_STA), Some(true));
    assert_eq!(reading.get(WirelessFlags::KILLSWITCH), Some(false));
    assert_eq!(reading.get(WirelessFlags::WIFI_EX), None);

    binding.wireless_set(WirelessFlags::empty()).unwrap();
    let calls: Vec<_> = acpi.calls().into_iter().map(|(m, _)| m).collect();
    assert!(calls.ends_with(&["DUSB", "BTPF"]));

    driver.acpi_device_removed(BT0);
    assert_eq!(binding.wireless_get(), Err(Error::NoSuchDevice));
}

struct SmiRig {
    rig: Rig,
    pci: Arc<FakePci>,
    firmware: Arc<FakeFirmware>,
}

impl SmiRig {
    fn new(bridge: Option<omnibook::PciDevice>) -> Self {
        let rig = Rig::new();
        let firmware = FakeFirmware::new(rig.hw.clone());
        let pci = Arc::new(FakePci {
            bridge,
            pmbase: 0x1000,
            ..FakePci::default()
        });
        Self { rig, pci, firmware }
    }

    fn driver(&self, model: ModelMask) -> omnibook::Driver {
        self.rig.driver_with(
            DriverConfig::new(model),
            self.rig
                .platform()
                .with_pci(self.pci.clone())
                .with_smi(self.firmware.clone()),
        )
    }
}

#[test]
fn smi_radios_through_the_mailbox() {
    let smi = SmiRig::new(Some(ICH4M));
    smi.firmware.answer(0x59, 0);
    smi.firmware.answer(0x65, 0x1 | 0x4 | 0x8);
    smi.rig.hw.with(|s| {
        s.dwords.insert(0x102c, 0xdead_beef);
    });
    let driver = smi.driver(ModelMask::TSM40);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Smi)).unwrap();

    let reading = binding.wireless_get().unwrap();
    assert_eq!(
        reading.state,
        WirelessFlags::BT_EX | WirelessFlags::WIFI_EX | WirelessFlags::WIFI_STA
    );

    binding.wireless_set(WirelessFlags::BT_STA | WirelessFlags::WIFI_STA).unwrap();
    assert_eq!(smi.firmware.calls().last(), Some(&(0x64, 0x2 | 0x8)));
    smi.rig.hw.with(|s| assert_eq!(s.dwords[&0x102c], 0xdead_beef, "GPE0_EN restored"));
    assert!(smi.rig.regions.owns(0xb2) && smi.rig.regions.owns(0x300));

    drop(binding);
    assert_eq!(smi.pci.references.load(Ordering::SeqCst), 0);
    assert!(smi.rig.regions.owned.lock().unwrap().is_empty());
}

#[test]
fn smi_firmware_error_is_reported() {
    let smi = SmiRig::new(Some(ICH4M));
    smi.firmware.status.store(1, Ordering::SeqCst);
    let driver = smi.driver(ModelMask::TSM40);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Smi)).unwrap();

    assert_eq!(binding.hotkeys_get(), Err(Error::Io("SMI command failed")));
}

#[test]
fn smi_hotkeys_and_display() {
    let smi = SmiRig::new(Some(ICH4M));
    smi.firmware.answer(0x43, 0x01 | 0x08);
    smi.firmware.answer(0x37, 1);
    let driver = smi.driver(ModelMask::TSM40);
    let binding = driver.bind_operation(Operation::bare(BackendKind::Smi)).unwrap();

    let keys = binding.hotkeys_get().unwrap();
    assert_eq!(keys.state, HotkeyFlags::FN | HotkeyFlags::DOCK);
    assert_eq!(keys.get(HotkeyFlags::ONETOUCH), None);
    assert_eq!(
        binding.display_get().unwrap().state,
        DisplayFlags::LCD_ON | DisplayFlags::CRT_ON
    );
}

#[test]
fn smi_needs_its_model_and_bridge() {
    let other = SmiRig::new(Some(ICH4M));
    assert_eq!(
        other
            .driver(ModelMask::TSM30X)
            .bind_operation(Operation::bare(BackendKind::Smi))
            .unwrap_err(),
        Error::NoSuchDevice
    );

    let bare = SmiRig::new(None);
    assert_eq!(
        bare.driver(ModelMask::TSM40)
            .bind_operation(Operation::bare(BackendKind::Smi))
            .unwrap_err(),
        Error::NoSuchDevice
    );
    assert_eq!(bare.pci.references.load(Ordering::SeqCst), 0);
}

#[test]
fn smi_floating_mailbox_releases_everything() {
    let smi = SmiRig::new(Some(ICH4M));
    smi.rig.hw.with(|s| s.mailbox = 0xffff);
    let driver = smi.driver(ModelMask::TSM40);

    assert_eq!(
        driver.bind_operation(Operation::bare(BackendKind::Smi)).unwrap_err(),
        Error::NoSuchDevice
    );
    assert_eq!(smi.pci.references.load(Ordering::SeqCst), 0);
    assert!(smi.rig.regions.owned.lock().unwrap().is_empty());
}
