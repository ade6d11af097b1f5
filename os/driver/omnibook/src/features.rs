//! Feature adapters.
//!
//! Each adapter binds its operation table once in `probe` and then only
//! talks to its [`Binding`](crate::Binding)s. Adapters for models the table
//! does not list fail with [`Error::NoSuchDevice`](crate::Error::NoSuchDevice).

/// A model mask spelled like the tables of the register documentation:
/// `models!(XE3GF | TSP10)`.
macro_rules! models {
    ($($model:ident)|+) => {
        $crate::ModelMask::empty()$(.union($crate::ModelMask::$model))+
    };
}

mod ac;
mod battery;
mod blank;
mod display;
mod dock;
mod fan;
mod fan_policy;
mod hotkeys;
mod lcd;
mod muteled;
mod temperature;
mod touchpad;
mod wireless;

pub use ac::{AC_TABLE, Ac};
pub use battery::{
    BATTERY_TABLE, Battery, BatteryInfo, BatteryLayout, BatteryReport, BatteryStatus, ChargeState,
    Chemistry,
};
pub use blank::{BLANK_TABLE, Blank, BlankMethod};
pub use display::{DISPLAY_TABLE, Display, DisplayStatus};
pub use dock::{DOCK_TABLE, Dock};
pub use fan::{FAN_TABLE, Fan, FanKind, FanStatus};
pub use fan_policy::{FAN_POLICY_TABLE, FanPolicy, FanPolicyControl};
pub use hotkeys::{FN_KEYS_TABLE, HOTKEYS_TABLE, HotkeyStatus, Hotkeys};
pub use lcd::{LCD_TABLE, Lcd};
pub use muteled::{MUTELED_TABLE, MuteLed};
pub use temperature::{TEMPERATURE_TABLE, Temperature};
pub use touchpad::{TOUCHPAD_TABLE, Touchpad};
pub use wireless::{BLUETOOTH_TABLE, Radio, RadioKind, WIFI_TABLE};

use crate::{Driver, Error, Result};
use log::{error, info};

/// Every feature the running model supports.
#[derive(Debug, Default)]
pub struct Features {
    pub ac: Option<Ac>,
    pub battery: Option<Battery>,
    pub blank: Option<Blank>,
    pub bluetooth: Option<Radio>,
    pub display: Option<Display>,
    pub dock: Option<Dock>,
    pub fan: Option<Fan>,
    pub fan_policy: Option<FanPolicyControl>,
    pub hotkeys: Option<Hotkeys>,
    pub lcd: Option<Lcd>,
    pub muteled: Option<MuteLed>,
    pub temperature: Option<Temperature>,
    pub touchpad: Option<Touchpad>,
    pub wifi: Option<Radio>,
}

impl Features {
    /// Probes every feature; failures leave that feature out.
    #[must_use]
    pub fn probe(driver: &Driver) -> Self {
        Self {
            ac: optional("ac", Ac::probe(driver)),
            battery: optional("battery", Battery::probe(driver)),
            blank: optional("blank", Blank::probe(driver)),
            bluetooth: optional("bluetooth", Radio::probe(driver, RadioKind::Bluetooth)),
            display: optional("display", Display::probe(driver)),
            dock: optional("dock", Dock::probe(driver)),
            fan: optional("fan", Fan::probe(driver)),
            fan_policy: optional("fan_policy", FanPolicyControl::probe(driver)),
            hotkeys: optional("hotkeys", Hotkeys::probe(driver)),
            lcd: optional("lcd", Lcd::probe(driver)),
            muteled: optional("muteled", MuteLed::probe(driver)),
            temperature: optional("temperature", Temperature::probe(driver)),
            touchpad: optional("touchpad", Touchpad::probe(driver)),
            wifi: optional("wifi", Radio::probe(driver, RadioKind::Wifi)),
        }
    }
}

fn optional<T>(name: &str, probed: Result<T>) -> Option<T> {
    match probed {
        Ok(feature) => {
            info!("{name}: enabled");
            Some(feature)
        }
        Err(Error::NoSuchDevice) => None,
        Err(err) => {
            error!("{name}: {err}");
            None
        }
    }
}

const fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

const fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}
