//! Simulated laptop hardware shared by the integration tests.

#![allow(dead_code)]

use omnibook::{
    AcpiFault, AcpiHandle, AcpiHost, AcpiValue, Driver, DriverConfig, ModelMask, PciBus,
    PciDevice, Platform, Result, SmiTrap,
};
use omnibook_io::{Delay, IoRegions, PortIo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
enum EcPhase {
    Idle,
    ReadAddr,
    WriteAddr,
    WriteData(u8),
}

/// Called after every EC register write with the register file, the
/// address and the value.
pub type EcHook = Box<dyn FnMut(&mut [u8; 256], u8, u8) + Send>;

pub struct State {
    pub ec: [u8; 256],
    phase: EcPhase,
    out: Option<u8>,
    pub ec_writes: Vec<(u8, u8)>,
    pub ec_hook: Option<EcHook>,
    kbc_armed: bool,
    /// Data bytes following the vendor control command.
    pub kbc: Vec<u8>,
    /// Raw I/O ports outside the controllers.
    pub ports: HashMap<u16, u8>,
    pub port_writes: Vec<(u16, u8)>,
    pub cdi: [u8; 256],
    cdi_index: u8,
    pub cdi_writes: Vec<(u8, u8)>,
    pub rtc: [u8; 256],
    rtc_index: u8,
    /// What the SMSC mailbox data port answers.
    pub mailbox: u16,
    pub dwords: HashMap<u16, u32>,
    pub ati_status: u16,
}

/// EC and KBC handshakes, raw ports, the CDI pair and the RTC mailbox.
pub struct Hardware {
    state: Mutex<State>,
}

impl Hardware {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                ec: [0; 256],
                phase: EcPhase::Idle,
                out: None,
                ec_writes: Vec::new(),
                ec_hook: None,
                kbc_armed: false,
                kbc: Vec::new(),
                ports: HashMap::new(),
                port_writes: Vec::new(),
                cdi: [0; 256],
                cdi_index: 0,
                cdi_writes: Vec::new(),
                rtc: [0; 256],
                rtc_index: 0,
                mailbox: 0,
                dwords: HashMap::new(),
                ati_status: 0,
            }),
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

impl PortIo for Hardware {
    fn inb(&self, port: u16) -> u8 {
        self.with(|s| match port {
            0x66 => u8::from(s.out.is_some()),
            0x64 => 0,
            0x62 => s.out.take().unwrap_or(0xff),
            0x301 => s.cdi[usize::from(s.cdi_index)],
            0x73 => s.rtc[usize::from(s.rtc_index)],
            _ => s.ports.get(&port).copied().unwrap_or(0xff),
        })
    }

    fn outb(&self, port: u16, value: u8) {
        self.with(|s| match (port, s.phase) {
            (0x66, _) => match value {
                0x80 => s.phase = EcPhase::ReadAddr,
                0x81 => s.phase = EcPhase::WriteAddr,
                _ => {}
            },
            (0x62, EcPhase::ReadAddr) => {
                s.out = Some(s.ec[usize::from(value)]);
                s.phase = EcPhase::Idle;
            }
            (0x62, EcPhase::WriteAddr) => s.phase = EcPhase::WriteData(value),
            (0x62, EcPhase::WriteData(addr)) => {
                s.ec[usize::from(addr)] = value;
                s.ec_writes.push((addr, value));
                s.phase = EcPhase::Idle;
                if let Some(hook) = s.ec_hook.as_mut() {
                    hook(&mut s.ec, addr, value);
                }
            }
            (0x64, _) => s.kbc_armed = value == 0x59,
            (0x60, _) => {
                if s.kbc_armed {
                    s.kbc.push(value);
                    s.kbc_armed = false;
                }
            }
            (0x300, _) => s.cdi_index = value,
            (0x301, _) => {
                s.cdi[usize::from(s.cdi_index)] = value;
                s.cdi_writes.push((s.cdi_index, value));
            }
            (0x72, _) => s.rtc_index = value,
            (0x73, _) => s.rtc[usize::from(s.rtc_index)] = value,
            _ => {
                s.ports.insert(port, value);
                s.port_writes.push((port, value));
            }
        });
    }

    fn inw(&self, port: u16) -> u16 {
        self.with(|s| match port {
            0x301 => s.mailbox,
            0xb1 => s.ati_status,
            _ => 0xffff,
        })
    }

    fn outw(&self, _port: u16, _value: u16) {}

    fn inl(&self, port: u16) -> u32 {
        self.with(|s| s.dwords.get(&port).copied().unwrap_or(0))
    }

    fn outl(&self, port: u16, value: u32) {
        self.with(|s| {
            s.dwords.insert(port, value);
        });
    }
}

#[derive(Default)]
pub struct CountingDelay(pub AtomicU32);

impl Delay for CountingDelay {
    fn mdelay(&self, ms: u32) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

/// Port reservations, refusing overlaps.
#[derive(Default)]
pub struct Ledger {
    pub owned: Mutex<Vec<(u16, u16)>>,
    pub denied: Mutex<Vec<u16>>,
}

impl Ledger {
    pub fn owns(&self, start: u16) -> bool {
        self.owned.lock().unwrap().iter().any(|&(s, _)| s == start)
    }
}

impl IoRegions for Ledger {
    fn request(&self, start: u16, len: u16) -> bool {
        if self.denied.lock().unwrap().contains(&start) {
            return false;
        }
        let mut owned = self.owned.lock().unwrap();
        let end = start + len;
        if owned.iter().any(|&(s, l)| start < s + l && s < end) {
            return false;
        }
        owned.push((start, len));
        true
    }

    fn release(&self, start: u16, len: u16) {
        self.owned.lock().unwrap().retain(|&r| r != (start, len));
    }
}

pub const EC0: AcpiHandle = AcpiHandle(1);
pub const BT0: AcpiHandle = AcpiHandle(2);

#[derive(Default)]
pub struct AcpiState {
    pub paths: HashMap<&'static str, AcpiHandle>,
    pub methods: HashMap<(AcpiHandle, &'static str), AcpiValue>,
    pub calls: Vec<(&'static str, Option<u64>)>,
    pub failing: Vec<&'static str>,
}

/// ACPI namespace with canned method results.
#[derive(Default)]
pub struct FakeAcpi {
    pub state: Mutex<AcpiState>,
}

impl FakeAcpi {
    /// An EC device at the first known path with the given methods.
    pub fn with_ec(methods: &[(&'static str, AcpiValue)]) -> Arc<Self> {
        let acpi = Self::default();
        {
            let mut state = acpi.state.lock().unwrap();
            state.paths.insert("\\_SB.PCI0.LPCB.EC0", EC0);
            for &(name, value) in methods {
                state.methods.insert((EC0, name), value);
            }
        }
        Arc::new(acpi)
    }

    pub fn define(&self, device: AcpiHandle, method: &'static str, value: AcpiValue) {
        self.state.lock().unwrap().methods.insert((device, method), value);
    }

    pub fn calls(&self) -> Vec<(&'static str, Option<u64>)> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl AcpiHost for FakeAcpi {
    fn handle(&self, path: &str) -> Option<AcpiHandle> {
        self.state.lock().unwrap().paths.get(path).copied()
    }

    fn has_method(&self, device: AcpiHandle, method: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .methods
            .keys()
            .any(|&(d, m)| d == device && m == method)
    }

    fn evaluate(
        &self,
        device: AcpiHandle,
        method: &str,
        arg: Option<u64>,
    ) -> std::result::Result<AcpiValue, AcpiFault> {
        let mut state = self.state.lock().unwrap();
        let Some((&(_, name), &value)) = state
            .methods
            .iter()
            .find(|&(&(d, m), _)| d == device && m == method)
        else {
            return Err(AcpiFault);
        };
        state.calls.push((name, arg));
        if state.failing.contains(&name) {
            return Err(AcpiFault);
        }
        Ok(value)
    }
}

pub const ICH4M: PciDevice = PciDevice {
    handle: 7,
    vendor: 0x8086,
    device: 0x24cc,
};

/// A PCI bus with at most one LPC bridge.
#[derive(Default)]
pub struct FakePci {
    pub bridge: Option<PciDevice>,
    pub pmbase: u32,
    pub references: AtomicU32,
}

impl PciBus for FakePci {
    fn find(&self, vendor: u16, device: u16) -> Option<PciDevice> {
        let bridge = self
            .bridge
            .filter(|b| b.vendor == vendor && b.device == device)?;
        self.references.fetch_add(1, Ordering::SeqCst);
        Some(bridge)
    }

    fn enable(&self, _dev: &PciDevice) -> Result<()> {
        Ok(())
    }

    fn read_config_dword(&self, _dev: &PciDevice, offset: u8) -> u32 {
        if offset == 0x40 { self.pmbase | 1 } else { 0 }
    }

    fn release(&self, _dev: &PciDevice) {
        self.references.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Firmware behind the software SMI: answers from a table keyed by
/// function number through the RTC mailbox at the Intel offset.
pub struct FakeFirmware {
    pub hw: Arc<Hardware>,
    pub answers: Mutex<HashMap<u8, u8>>,
    /// `(function, first input byte)` of every trap.
    pub calls: Mutex<Vec<(u8, u8)>>,
    pub status: AtomicU32,
}

impl FakeFirmware {
    pub fn new(hw: Arc<Hardware>) -> Arc<Self> {
        Arc::new(Self {
            hw,
            answers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            status: AtomicU32::new(0),
        })
    }

    pub fn answer(&self, function: u8, value: u8) {
        self.answers.lock().unwrap().insert(function, value);
    }

    pub fn calls(&self) -> Vec<(u8, u8)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SmiTrap for FakeFirmware {
    fn trap(&self, port: u16, function: u16) -> u32 {
        assert_eq!(port, 0xb2);
        assert_eq!(function & 0xff, 0xe4);
        let [_, number] = function.to_le_bytes();
        let answer = self.answers.lock().unwrap().get(&number).copied();
        self.hw.with(|s| {
            self.calls.lock().unwrap().push((number, s.rtc[0x60]));
            s.rtc[0x60] = answer.unwrap_or(0);
        });
        self.status.load(Ordering::SeqCst)
    }
}

/// Everything a test may want to poke at after building a driver.
pub struct Rig {
    pub hw: Arc<Hardware>,
    pub delay: Arc<CountingDelay>,
    pub regions: Arc<Ledger>,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            hw: Hardware::new(),
            delay: Arc::new(CountingDelay::default()),
            regions: Arc::new(Ledger::default()),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(self.hw.clone(), self.delay.clone()).with_regions(self.regions.clone())
    }

    pub fn driver(&self, model: ModelMask) -> Driver {
        Driver::new(DriverConfig::new(model), self.platform())
    }

    pub fn driver_with(&self, config: DriverConfig, platform: Platform) -> Driver {
        Driver::new(config, platform)
    }
}
