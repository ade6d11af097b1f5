mod common;

use common::Rig;
use log::LevelFilter;
use omnibook::features::Hotkeys;
use omnibook::{DriverConfig, HotkeyFlags, ModelMask};
use omnibook_log::DriverLogger;
use std::fmt;
use std::sync::Mutex;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn capture(line: fmt::Arguments<'_>) {
    LINES.lock().unwrap().push(line.to_string());
}

static LOGGER: DriverLogger = DriverLogger::new(LevelFilter::Info, capture);

#[test]
fn driver_reports_through_the_log_facade() {
    LOGGER.install().unwrap();

    let rig = Rig::new();
    let driver = rig.driver_with(DriverConfig::forced(ModelMask::TSM30X), rig.platform());
    let hotkeys = Hotkeys::probe(&driver).unwrap();
    hotkeys.set(HotkeyFlags::empty()).unwrap();

    let lines = LINES.lock().unwrap().clone();
    let has = |needle: &str| lines.iter().any(|line| line.contains(needle));
    assert!(has("[WARN] omnibook::driver: forced model 12"), "{lines:#?}");
    assert!(has("[INFO] omnibook::features::hotkeys: Enabling Hotkey buttons."));
    assert!(has("[WARN] omnibook::features::hotkeys: Disabling of Fn keys not implemented."));
    assert!(lines.iter().all(|line| line.starts_with(omnibook_log::PREFIX)));
}
