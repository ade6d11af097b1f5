use super::{
    Backend, ByteRead, ByteWrite, DisplayControl, HotkeyControl, WirelessControl, masked, register,
};
use crate::platform::{PciBus, PciDevice, Platform, SmiTrap};
use crate::{
    BackendKind, DisplayFlags, Error, HotkeyFlags, ModelMask, Operation, Reading, Result,
    WirelessFlags,
};
use alloc::sync::Arc;
use log::{debug, error, trace};
use omnibook_io::{IoRegions, PortIo, RegionClaim};
use omnibook_sync::{InterruptControl, Mutex, MutexGuard, SpinLock, TaskSignals};

const VENDOR_INTEL: u16 = 0x8086;
const VENDOR_ATI: u16 = 0x1002;

/// LPC bridges whose chipset the SMI calling convention is known for.
pub const LPC_BRIDGES: [(u16, u16); 8] = [
    (VENDOR_INTEL, 0x24cc), // ICH4-M
    (VENDOR_INTEL, 0x24dc), // ICH5
    (VENDOR_INTEL, 0x2640), // ICH6
    (VENDOR_INTEL, 0x2641), // ICH6-M
    (VENDOR_INTEL, 0x27b8), // ICH7
    (VENDOR_INTEL, 0x27b9), // ICH7-M
    (VENDOR_INTEL, 0x27bd), // ICH7-M DH
    (VENDOR_ATI, 0x4377),   // SB400
];

const INTEL_PMBASE: u8 = 0x40;
const INTEL_PMBASE_MASK: u32 = 0xff80;
const INTEL_GPE0_EN: u32 = 0x2c;
const INTEL_OFFSET: u8 = 0x60;
const INTEL_SMI_PORT: u16 = 0xb2;
const ATI_OFFSET: u8 = 0xef;
const ATI_SMI_PORT: u16 = 0xb0;

/// RTC CMOS index/data pair carrying the mailbox.
const RTC_INDEX_PORT: u16 = 0x72;
const RTC_DATA_PORT: u16 = 0x73;
const BUFFER_SIZE: usize = 0x20;

/// SMSC mailbox index/data pair.
const EC_INDEX_PORT: u16 = 0x300;
const EC_DATA_PORT: u16 = 0x301;

/// Low byte of every function word written to the SMI port.
const SMI_MAGIC: u16 = 0xe4;

const SMI_FN_PRESSED: u16 = 0x8f;
const SMI_GET_DISPLAY_STATE: u8 = 0x37;
const SMI_SET_DISPLAY_STATE: u8 = 0x38;
const SMI_GET_FN_INTERFACE: u8 = 0x43;
const SMI_SET_FN_INTERFACE: u8 = 0x44;
const SMI_SET_FN_F5_INTERFACE: u8 = 0x45;
const SMI_GET_KILL_SWITCH: u8 = 0x59;
const SMI_SET_AERIAL: u8 = 0x64;
const SMI_GET_AERIAL: u8 = 0x65;

const BTEX: u8 = 0x1;
const BTAT: u8 = 0x2;
const WLEX: u8 = 0x4;
const WLAT: u8 = 0x8;

const FN_KEYS: u8 = 0x01;
const STICK_KEYS: u8 = 0x02;
const FN_TWICE_LOCK: u8 = 0x04;
const FN_DOCK: u8 = 0x08;

/// Display states reported by the firmware, by index.
const DISPLAY_MODES: [DisplayFlags; 5] = [
    DisplayFlags::LCD_ON,
    DisplayFlags::LCD_ON.union(DisplayFlags::CRT_ON),
    DisplayFlags::CRT_ON,
    DisplayFlags::LCD_ON.union(DisplayFlags::TVO_ON),
    DisplayFlags::TVO_ON,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chipset {
    /// SCI events are masked around the trap through `GPE0_EN`.
    Intel { gpe0_en: u16 },
    /// The result comes back on the port after the SMI port.
    Ati,
}

impl Chipset {
    const fn smi_port(self) -> u16 {
        match self {
            Self::Intel { .. } => INTEL_SMI_PORT,
            Self::Ati => ATI_SMI_PORT,
        }
    }

    const fn mailbox_offset(self) -> u8 {
        match self {
            Self::Intel { .. } => INTEL_OFFSET,
            Self::Ati => ATI_OFFSET,
        }
    }
}

/// What a successful probe holds on to.
struct Session {
    bridge: PciDevice,
    chipset: Chipset,
    _smi_ports: RegionClaim,
    _mailbox_ports: RegionClaim,
}

type Mailbox = [u8; BUFFER_SIZE];

/// Firmware calls of the Toshiba Satellite M40X through a software SMI.
///
/// Requests go through a 32-byte mailbox in RTC CMOS; the trap itself runs
/// under a spinlock with interrupts masked. A mutex serializes whole
/// requests.
pub struct SmiBackend {
    model: ModelMask,
    ports: Arc<dyn PortIo>,
    regions: Arc<dyn IoRegions>,
    irq: Arc<dyn InterruptControl>,
    signals: Arc<dyn TaskSignals>,
    pci: Option<Arc<dyn PciBus>>,
    trap: Option<Arc<dyn SmiTrap>>,
    session: Mutex<Option<Session>>,
    critical: SpinLock<()>,
}

impl SmiBackend {
    #[must_use]
    pub fn new(model: ModelMask, platform: &Platform) -> Self {
        Self {
            model,
            ports: Arc::clone(&platform.ports),
            regions: Arc::clone(&platform.regions),
            irq: Arc::clone(&platform.irq),
            signals: Arc::clone(&platform.signals),
            pci: platform.pci.clone(),
            trap: platform.smi.clone(),
            session: Mutex::new(None),
            critical: SpinLock::new(()),
        }
    }

    fn mailbox_read(&self, index: u16) -> u16 {
        let _irq = self.critical.lock_irq(&*self.irq);
        self.ports.outw(EC_INDEX_PORT, index);
        self.ports.inw(EC_DATA_PORT)
    }

    /// Claims ports and identifies the chipset behind `bridge`.
    fn open(&self, pci: &dyn PciBus, bridge: PciDevice) -> Result<Session> {
        if let Err(err) = pci.enable(&bridge) {
            error!("unable to enable the LPC bridge");
            return Err(err);
        }

        let chipset = if bridge.vendor == VENDOR_INTEL {
            let pmbase = pci.read_config_dword(&bridge, INTEL_PMBASE) & INTEL_PMBASE_MASK;
            let gpe0_en = u16::try_from(pmbase + INTEL_GPE0_EN).map_err(|_| Error::NoSuchDevice)?;
            Chipset::Intel { gpe0_en }
        } else {
            Chipset::Ati
        };

        let Some(smi_ports) = RegionClaim::request(&self.regions, chipset.smi_port(), 2) else {
            error!("request of the SMI I/O region failed");
            return Err(Error::NoSuchDevice);
        };
        let Some(mailbox_ports) = RegionClaim::request(&self.regions, EC_INDEX_PORT, 2) else {
            error!("request of the EC I/O region failed");
            return Err(Error::NoSuchDevice);
        };

        // Nothing decodes the mailbox on unsupported machines.
        let probe = self.mailbox_read(SMI_FN_PRESSED);
        debug!("SMSC mailbox probe read {probe:#06x}");
        if probe == 0xffff {
            error!("probing at SMSC mailbox registers failed");
            return Err(Error::NoSuchDevice);
        }

        Ok(Session {
            bridge,
            chipset,
            _smi_ports: smi_ports,
            _mailbox_ports: mailbox_ports,
        })
    }

    /// Runs one firmware call.
    fn command(
        &self,
        held: &MutexGuard<'_, Option<Session>>,
        function: u8,
        input: &Mailbox,
    ) -> Result<Mailbox> {
        let session = held.as_ref().ok_or(Error::NoSuchDevice)?;
        let trap = self.trap.as_deref().ok_or(Error::NoSuchDevice)?;
        let offset = session.chipset.mailbox_offset();

        for (slot, &byte) in (0u8..).zip(input) {
            self.ports.outb(RTC_INDEX_PORT, offset.wrapping_add(slot));
            self.ports.outb(RTC_DATA_PORT, byte);
        }

        let word = (u16::from(function) << 8) | SMI_MAGIC;
        let status = {
            let _irq = self.critical.lock_irq(&*self.irq);
            match session.chipset {
                Chipset::Intel { gpe0_en } => {
                    let saved = self.ports.inl(gpe0_en);
                    self.ports.outl(gpe0_en, 0);
                    let status = trap.trap(INTEL_SMI_PORT, word);
                    self.ports.outl(gpe0_en, saved);
                    status
                }
                Chipset::Ati => {
                    trap.trap(ATI_SMI_PORT, word);
                    u32::from(self.ports.inw(ATI_SMI_PORT + 1))
                }
            }
        };

        let mut output = [0; BUFFER_SIZE];
        for (slot, byte) in (0u8..).zip(output.iter_mut()) {
            self.ports.outb(RTC_INDEX_PORT, offset.wrapping_add(slot));
            *byte = self.ports.inb(RTC_DATA_PORT);
        }

        trace!("SMI function {function:#04x} -> status {status:#x}, {:#04x}", output[0]);
        if status != 0 {
            error!("SMI function {function:#04x} failed with status {status:#x}");
            return Err(Error::Io("SMI command failed"));
        }
        Ok(output)
    }

    fn read(&self, function: u8) -> Result<u8> {
        let held = self.session.lock_interruptible(&*self.signals)?;
        let output = self.command(&held, function, &[0; BUFFER_SIZE])?;
        Ok(output[0])
    }

    fn write(&self, function: u8, data: u8) -> Result<()> {
        let held = self.session.lock_interruptible(&*self.signals)?;
        let mut input = [0; BUFFER_SIZE];
        input[0] = data;
        self.command(&held, function, &input)?;
        Ok(())
    }
}

impl Backend for SmiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Smi
    }

    fn probe(&self) -> Result<()> {
        if !self.model.intersects(ModelMask::TSM40) {
            debug!("no SMI interface on {:?}", self.model);
            return Err(Error::NoSuchDevice);
        }
        let (Some(pci), Some(_)) = (self.pci.as_deref(), self.trap.as_ref()) else {
            error!("SMI backend needs PCI access and an SMI trap");
            return Err(Error::NoSuchDevice);
        };

        let mut held = self.session.lock_interruptible(&*self.signals)?;
        let Some(bridge) = LPC_BRIDGES
            .iter()
            .find_map(|&(vendor, device)| pci.find(vendor, device))
        else {
            error!("no supported LPC I/O bridge found");
            return Err(Error::NoSuchDevice);
        };

        match self.open(pci, bridge) {
            Ok(session) => {
                debug!("SMI backend on {:04x}:{:04x}", bridge.vendor, bridge.device);
                *held = Some(session);
                Ok(())
            }
            Err(err) => {
                pci.release(&bridge);
                Err(err)
            }
        }
    }

    fn dispose(&self) {
        let session = self.session.lock().take();
        if let (Some(session), Some(pci)) = (session, self.pci.as_deref()) {
            pci.release(&session.bridge);
        }
    }

    fn byte_reader(&self) -> Option<&dyn ByteRead> {
        Some(self)
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        Some(self)
    }

    fn wireless(&self) -> Option<&dyn WirelessControl> {
        Some(self)
    }

    fn display(&self) -> Option<&dyn DisplayControl> {
        Some(self)
    }

    fn hotkeys(&self) -> Option<&dyn HotkeyControl> {
        Some(self)
    }
}

/// The read address is the firmware function number.
impl ByteRead for SmiBackend {
    fn byte_read(&self, op: &Operation) -> Result<u8> {
        let value = self.read(register(op.read_addr)?)?;
        Ok(masked(op, value))
    }
}

impl ByteWrite for SmiBackend {
    fn byte_write(&self, op: &Operation, value: u8) -> Result<()> {
        self.write(register(op.write_addr)?, value)
    }
}

impl WirelessControl for SmiBackend {
    fn wireless_get(&self, _op: &Operation) -> Result<Reading<WirelessFlags>> {
        let mut flags = WirelessFlags::empty();
        flags.set(WirelessFlags::KILLSWITCH, self.read(SMI_GET_KILL_SWITCH)? != 0);

        let aerial = self.read(SMI_GET_AERIAL)?;
        flags.set(WirelessFlags::WIFI_EX, aerial & WLEX != 0);
        flags.set(WirelessFlags::WIFI_STA, aerial & WLAT != 0);
        flags.set(WirelessFlags::BT_EX, aerial & BTEX != 0);
        flags.set(WirelessFlags::BT_STA, aerial & BTAT != 0);
        Ok(Reading::new(flags, WirelessFlags::all()))
    }

    fn wireless_set(&self, _op: &Operation, state: WirelessFlags) -> Result<WirelessFlags> {
        let mut data = 0;
        if state.contains(WirelessFlags::BT_STA) {
            data |= BTAT;
        }
        if state.contains(WirelessFlags::WIFI_STA) {
            data |= WLAT;
        }
        self.write(SMI_SET_AERIAL, data)?;
        Ok(WirelessFlags::WIFI_STA | WirelessFlags::BT_STA)
    }
}

const FN_BITS: [(u8, HotkeyFlags); 4] = [
    (FN_KEYS, HotkeyFlags::FN),
    (STICK_KEYS, HotkeyFlags::STICK),
    (FN_TWICE_LOCK, HotkeyFlags::TWICE_LOCK),
    (FN_DOCK, HotkeyFlags::DOCK),
];

impl HotkeyControl for SmiBackend {
    fn hotkeys_get(&self, _op: &Operation) -> Result<Reading<HotkeyFlags>> {
        let data = self.read(SMI_GET_FN_INTERFACE)?;
        let mut state = HotkeyFlags::empty();
        let mut supported = HotkeyFlags::empty();
        for (bit, flag) in FN_BITS {
            state.set(flag, data & bit != 0);
            supported |= flag;
        }
        Ok(Reading::new(state, supported))
    }

    fn hotkeys_set(&self, _op: &Operation, state: HotkeyFlags) -> Result<HotkeyFlags> {
        let data = FN_BITS
            .iter()
            .filter(|(_, flag)| state.contains(*flag))
            .fold(0, |data, (bit, _)| data | bit);
        self.write(SMI_SET_FN_INTERFACE, data)?;
        self.write(
            SMI_SET_FN_F5_INTERFACE,
            u8::from(state.contains(HotkeyFlags::FNF5)),
        )?;
        Ok(HotkeyFlags::FN
            | HotkeyFlags::STICK
            | HotkeyFlags::TWICE_LOCK
            | HotkeyFlags::DOCK
            | HotkeyFlags::FNF5)
    }
}

impl DisplayControl for SmiBackend {
    fn display_get(&self, _op: &Operation) -> Result<Reading<DisplayFlags>> {
        let data = self.read(SMI_GET_DISPLAY_STATE)?;
        let state = DISPLAY_MODES
            .get(usize::from(data))
            .copied()
            .ok_or(Error::Io("display state out of range"))?;
        Ok(Reading::new(state, DisplayFlags::OUTPUTS))
    }

    fn display_set(&self, _op: &Operation, state: DisplayFlags) -> Result<DisplayFlags> {
        let Some(raw) = (0..)
            .zip(DISPLAY_MODES)
            .find_map(|(raw, mode)| (mode == state).then_some(raw))
        else {
            error!("display mode {:#x} is unsupported", state.bits());
            return Err(Error::InvalidArgument);
        };
        self.write(SMI_SET_DISPLAY_STATE, raw)?;
        Ok(DisplayFlags::OUTPUTS)
    }
}
