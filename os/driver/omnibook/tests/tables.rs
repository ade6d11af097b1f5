mod common;

use common::Rig;
use omnibook::features::{
    AC_TABLE, BATTERY_TABLE, BLANK_TABLE, BLUETOOTH_TABLE, DISPLAY_TABLE, DOCK_TABLE,
    FAN_POLICY_TABLE, FAN_TABLE, FN_KEYS_TABLE, HOTKEYS_TABLE, LCD_TABLE, MUTELED_TABLE,
    TEMPERATURE_TABLE, TOUCHPAD_TABLE, WIFI_TABLE,
};
use omnibook::registers::xe3gf;
use omnibook::table::{ambiguities, find};
use omnibook::{BackendKind, DriverConfig, Error, ModelMask, Operation, TableEntry};

#[test]
fn feature_tables_are_unambiguous() {
    let tables: [(&str, Vec<(usize, usize)>); 15] = [
        ("ac", ambiguities(&AC_TABLE)),
        ("battery", ambiguities(&BATTERY_TABLE)),
        ("blank", ambiguities(&BLANK_TABLE)),
        ("bluetooth", ambiguities(&BLUETOOTH_TABLE)),
        ("display", ambiguities(&DISPLAY_TABLE)),
        ("dock", ambiguities(&DOCK_TABLE)),
        ("fan", ambiguities(&FAN_TABLE)),
        ("fan_policy", ambiguities(&FAN_POLICY_TABLE)),
        ("fn_keys", ambiguities(&FN_KEYS_TABLE)),
        ("hotkeys", ambiguities(&HOTKEYS_TABLE)),
        ("lcd", ambiguities(&LCD_TABLE)),
        ("muteled", ambiguities(&MUTELED_TABLE)),
        ("temperature", ambiguities(&TEMPERATURE_TABLE)),
        ("touchpad", ambiguities(&TOUCHPAD_TABLE)),
        ("wifi", ambiguities(&WIFI_TABLE)),
    ];
    for (name, pairs) in tables {
        assert!(pairs.is_empty(), "{name}: overlapping entries {pairs:?}");
    }
}

#[test]
fn ac_on_xe3gf_reads_adapter_bit() {
    let entry = find(&AC_TABLE, ModelMask::XE3GF).expect("XE3GF has AC");
    assert_eq!(entry.op.backend, BackendKind::Ec);
    assert_eq!(entry.op.read_addr, xe3gf::ADP);
    assert_eq!(entry.op.read_mask, xe3gf::ADP_MASK);
}

#[test]
fn unlisted_model_finds_nothing() {
    assert!(find(&MUTELED_TABLE, ModelMask::XE3GF).is_none());
    assert!(find(&AC_TABLE, ModelMask::empty()).is_none());
}

#[test]
fn every_family_has_some_feature() {
    for model in ModelMask::all().iter() {
        let any = find(&AC_TABLE, model).is_some()
            || find(&LCD_TABLE, model).is_some()
            || find(&DISPLAY_TABLE, model).is_some();
        assert!(any, "{model:?} has no feature at all");
    }
}

#[test]
fn driver_rejects_ambiguous_tables_when_checking() {
    let table = [
        TableEntry::new(ModelMask::XE3GF, Operation::bare(BackendKind::Ec)),
        TableEntry::new(ModelMask::XE3GF | ModelMask::XE2, Operation::bare(BackendKind::Kbc)),
    ];
    let rig = Rig::new();

    let strict = rig.driver_with(
        DriverConfig::new(ModelMask::XE2).with_table_checks(true),
        rig.platform(),
    );
    assert_eq!(strict.lookup("test", &table).unwrap_err(), Error::InvalidArgument);

    let lax = rig.driver_with(
        DriverConfig::new(ModelMask::XE2).with_table_checks(false),
        rig.platform(),
    );
    assert_eq!(lax.lookup("test", &table).unwrap().op.backend, BackendKind::Kbc);
}

#[test]
fn lookup_miss_is_no_such_device() {
    let rig = Rig::new();
    let driver = rig.driver(ModelMask::XE2);
    assert_eq!(
        driver.lookup("muteled", &MUTELED_TABLE).unwrap_err(),
        Error::NoSuchDevice
    );
}

#[test]
fn legacy_ectype_selects_family() {
    let config = DriverConfig::from_legacy_ectype(13).unwrap();
    assert_eq!(config.model, ModelMask::TSM40);
    assert!(config.forced);
    assert_eq!(DriverConfig::from_legacy_ectype(0), Err(Error::InvalidArgument));
    assert_eq!(
        DriverConfig::from_model_name(" TSM30X "),
        Ok(DriverConfig::forced(ModelMask::TSM30X))
    );
}
