use super::{Backend, DisplayControl, WirelessControl};
use crate::platform::{AcpiHandle, AcpiHost, AcpiValue};
use crate::{BackendKind, DisplayFlags, Error, Operation, Reading, Result, WirelessFlags};
use alloc::sync::Arc;
use log::{debug, error, info};
use omnibook_sync::{Mutex, MutexGuard, TaskSignals};

/// Hardware ID of the Toshiba Bluetooth device.
pub const TOSHIBA_BLUETOOTH_HID: &str = "TOS6205";

/// Paths of the EC device, tried in order.
const EC_DEVICE_PATHS: [&str; 2] = ["\\_SB.PCI0.LPCB.EC0", "\\_SB.PCI0.LPC0.EC0"];

const GET_WIRELESS_METHOD: &str = "ANTR";
const SET_WIRELESS_METHOD: &str = "ANTW";
const WLAT: u64 = 0x1;
const BTAT: u64 = 0x2;
const WLEX: u64 = 0x4;
const BTEX: u64 = 0x8;
const KLSW: u64 = 0x10;

const GET_DISPLAY_METHOD: &str = "DOSS";
const SET_DISPLAY_METHOD: &str = "DOSW";
const LCD_CSTE: u64 = 0x1;
const CRT_CSTE: u64 = 0x2;
const TVO_CSTE: u64 = 0x4;
const LCD_CADL: u64 = 0x10;
const CRT_CADL: u64 = 0x20;
const TVO_CADL: u64 = 0x40;

const BT_STATUS_METHOD: &str = "BTST";
const BT_POWER_ON_METHOD: &str = "BTPO";
const BT_POWER_OFF_METHOD: &str = "BTPF";
const BT_ATTACH_USB_METHOD: &str = "AUSB";
const BT_DETACH_USB_METHOD: &str = "DUSB";
const BT_KILLSWITCH: u64 = 0x01;
const BT_USB_ATTACHED: u64 = 0x40;
const BT_POWERED: u64 = 0x80;

/// Output combinations `DOSW` accepts; the raw mode is the index plus one.
const DISPLAY_MODES: [DisplayFlags; 7] = [
    DisplayFlags::LCD_ON,
    DisplayFlags::CRT_ON,
    DisplayFlags::LCD_ON.union(DisplayFlags::CRT_ON),
    DisplayFlags::TVO_ON,
    DisplayFlags::LCD_ON.union(DisplayFlags::TVO_ON),
    DisplayFlags::CRT_ON.union(DisplayFlags::TVO_ON),
    DisplayFlags::OUTPUTS,
];

#[derive(Default)]
struct AcpiState {
    ec: Option<AcpiHandle>,
    /// `ANTR` and `ANTW` are both present on the EC device.
    antenna_methods: bool,
    bluetooth: Option<AcpiHandle>,
}

/// Methods of the ACPI EC device and the Toshiba Bluetooth device.
///
/// All evaluations are serialized by one mutex; helpers that evaluate take
/// its guard to prove the caller holds it.
pub struct AcpiBackend {
    host: Option<Arc<dyn AcpiHost>>,
    signals: Arc<dyn TaskSignals>,
    state: Mutex<AcpiState>,
}

impl AcpiBackend {
    #[must_use]
    pub fn new(host: Option<Arc<dyn AcpiHost>>, signals: Arc<dyn TaskSignals>) -> Self {
        Self {
            host,
            signals,
            state: Mutex::new(AcpiState::default()),
        }
    }

    fn host(&self) -> Result<&dyn AcpiHost> {
        self.host.as_deref().ok_or(Error::NoSuchDevice)
    }

    fn lock(&self) -> Result<MutexGuard<'_, AcpiState>> {
        Ok(self.state.lock_interruptible(&*self.signals)?)
    }

    /// Evaluates `method`; returns its integer result, if any.
    fn execute(
        &self,
        _held: &MutexGuard<'_, AcpiState>,
        device: AcpiHandle,
        method: &str,
        arg: Option<u64>,
    ) -> Result<Option<u64>> {
        let value = self.host()?.evaluate(device, method, arg).map_err(|err| {
            error!("{method}: {err}");
            Error::Io("ACPI method execution failed")
        })?;
        debug!("ACPI {method}({arg:?}) -> {value:?}");
        match value {
            AcpiValue::None => Ok(None),
            AcpiValue::Integer(v) => Ok(Some(v)),
            AcpiValue::Other => {
                error!("{method}: unexpected result type");
                Err(Error::InvalidArgument)
            }
        }
    }

    /// Evaluates a method that must return an integer.
    fn query(
        &self,
        held: &MutexGuard<'_, AcpiState>,
        device: AcpiHandle,
        method: &str,
    ) -> Result<u64> {
        self.execute(held, device, method, None)?.ok_or_else(|| {
            error!("{method}: result is not a number");
            Error::InvalidArgument
        })
    }

    fn ec(state: &MutexGuard<'_, AcpiState>) -> Result<AcpiHandle> {
        state.ec.ok_or(Error::NoSuchDevice)
    }

    /// Registers the Toshiba Bluetooth device announced by the ACPI bus.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if a device is registered already,
    /// [`Error::NoSuchDevice`] without ACPI or without a `BTST` method.
    pub fn bluetooth_added(&self, device: AcpiHandle) -> Result<()> {
        let host = self.host()?;
        let mut state = self.lock()?;
        if state.bluetooth.is_some() {
            return Err(Error::Busy);
        }
        if !host.has_method(device, BT_STATUS_METHOD) {
            error!("Bluetooth device lacks {BT_STATUS_METHOD}");
            return Err(Error::NoSuchDevice);
        }
        state.bluetooth = Some(device);
        info!("Toshiba Bluetooth device registered");
        Ok(())
    }

    /// Forgets the Bluetooth device if `device` is the registered one.
    pub fn bluetooth_removed(&self, device: AcpiHandle) {
        let mut state = self.state.lock();
        if state.bluetooth == Some(device) {
            state.bluetooth = None;
            info!("Toshiba Bluetooth device removed");
        }
    }

    fn bluetooth_get(
        &self,
        state: &MutexGuard<'_, AcpiState>,
        device: AcpiHandle,
    ) -> Result<Reading<WirelessFlags>> {
        let raw = self.query(state, device, BT_STATUS_METHOD)?;
        let mut flags = WirelessFlags::BT_EX;
        flags.set(WirelessFlags::KILLSWITCH, raw & BT_KILLSWITCH == 0);
        flags.set(
            WirelessFlags::BT_STA,
            raw & (BT_POWERED | BT_USB_ATTACHED) == BT_POWERED | BT_USB_ATTACHED,
        );
        Ok(Reading::new(
            flags,
            WirelessFlags::BT_EX | WirelessFlags::BT_STA | WirelessFlags::KILLSWITCH,
        ))
    }

    fn bluetooth_set(
        &self,
        state: &MutexGuard<'_, AcpiState>,
        device: AcpiHandle,
        on: bool,
    ) -> Result<WirelessFlags> {
        let sequence = if on {
            [BT_POWER_ON_METHOD, BT_ATTACH_USB_METHOD]
        } else {
            [BT_DETACH_USB_METHOD, BT_POWER_OFF_METHOD]
        };
        for method in sequence {
            self.execute(state, device, method, None)?;
        }
        Ok(WirelessFlags::BT_STA)
    }
}

impl Backend for AcpiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Acpi
    }

    fn probe(&self) -> Result<()> {
        let Ok(host) = self.host() else {
            error!("ACPI is disabled: feature unavailable");
            return Err(Error::NoSuchDevice);
        };
        let mut state = self.lock()?;

        let Some((path, ec)) = EC_DEVICE_PATHS
            .iter()
            .find_map(|path| host.handle(path).map(|handle| (path, handle)))
        else {
            error!("can't get handle on ACPI EC device");
            return Err(Error::NoSuchDevice);
        };

        state.antenna_methods = host.has_method(ec, GET_WIRELESS_METHOD)
            && host.has_method(ec, SET_WIRELESS_METHOD);
        state.ec = Some(ec);
        debug!(
            "ACPI EC device at {path}, antenna methods {}",
            if state.antenna_methods { "present" } else { "absent" }
        );
        Ok(())
    }

    fn dispose(&self) {
        let mut state = self.state.lock();
        state.ec = None;
        state.antenna_methods = false;
    }

    fn wireless(&self) -> Option<&dyn WirelessControl> {
        Some(self)
    }

    fn display(&self) -> Option<&dyn DisplayControl> {
        Some(self)
    }
}

impl WirelessControl for AcpiBackend {
    fn wireless_get(&self, _op: &Operation) -> Result<Reading<WirelessFlags>> {
        let state = self.lock()?;
        if !state.antenna_methods {
            let device = state.bluetooth.ok_or(Error::NoSuchDevice)?;
            return self.bluetooth_get(&state, device);
        }

        let raw = self.query(&state, Self::ec(&state)?, GET_WIRELESS_METHOD)?;
        let mut flags = WirelessFlags::empty();
        flags.set(WirelessFlags::WIFI_EX, raw & WLEX != 0);
        flags.set(WirelessFlags::WIFI_STA, raw & WLAT != 0);
        flags.set(WirelessFlags::KILLSWITCH, raw & KLSW != 0);
        flags.set(WirelessFlags::BT_EX, raw & BTEX != 0);
        flags.set(WirelessFlags::BT_STA, raw & BTAT != 0);
        Ok(Reading::new(flags, WirelessFlags::all()))
    }

    fn wireless_set(&self, _op: &Operation, state: WirelessFlags) -> Result<WirelessFlags> {
        let guard = self.lock()?;
        if !guard.antenna_methods {
            let device = guard.bluetooth.ok_or(Error::NoSuchDevice)?;
            return self.bluetooth_set(&guard, device, state.contains(WirelessFlags::BT_STA));
        }

        let mut raw = 0;
        if state.contains(WirelessFlags::WIFI_STA) {
            raw |= WLAT;
        }
        if state.contains(WirelessFlags::BT_STA) {
            raw |= BTAT;
        }
        debug!("{SET_WIRELESS_METHOD} raw state {raw:#x}");
        self.execute(&guard, Self::ec(&guard)?, SET_WIRELESS_METHOD, Some(raw))?;
        Ok(WirelessFlags::WIFI_STA | WirelessFlags::BT_STA)
    }
}

impl DisplayControl for AcpiBackend {
    fn display_get(&self, _op: &Operation) -> Result<Reading<DisplayFlags>> {
        let state = self.lock()?;
        let raw = self.query(&state, Self::ec(&state)?, GET_DISPLAY_METHOD)?;

        let mut flags = DisplayFlags::empty();
        for (bit, flag) in [
            (LCD_CSTE, DisplayFlags::LCD_ON),
            (CRT_CSTE, DisplayFlags::CRT_ON),
            (TVO_CSTE, DisplayFlags::TVO_ON),
            (LCD_CADL, DisplayFlags::LCD_DET),
            (CRT_CADL, DisplayFlags::CRT_DET),
            (TVO_CADL, DisplayFlags::TVO_DET),
        ] {
            flags.set(flag, raw & bit != 0);
        }
        Ok(Reading::new(flags, DisplayFlags::all()))
    }

    fn display_set(&self, _op: &Operation, state: DisplayFlags) -> Result<DisplayFlags> {
        let Some(mode) = (1..)
            .zip(DISPLAY_MODES)
            .find_map(|(raw, mode)| (mode == state).then_some(raw))
        else {
            error!("display mode {:#x} is unsupported", state.bits());
            return Err(Error::InvalidArgument);
        };
        let guard = self.lock()?;
        self.execute(&guard, Self::ec(&guard)?, SET_DISPLAY_METHOD, Some(mode))?;
        Ok(DisplayFlags::OUTPUTS)
    }
}
