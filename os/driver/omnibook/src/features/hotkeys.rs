use crate::registers::{cdi, kbc};
use crate::{
    BackendKind, Binding, Driver, Error, HotkeyFlags, MaskOp, Operation, Reading, Result,
    TableEntry,
};
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};
use log::{info, warn};

pub const HOTKEYS_TABLE: [TableEntry; 2] = [
    TableEntry::new(
        models!(
            XE3GF | XE3GC | OB500 | OB510 | OB6000 | OB6100 | XE4500 | AMILOD | TSP10 | TSM30X
        ),
        Operation::command(BackendKind::Kbc, kbc::ONETOUCH_ENABLE, kbc::ONETOUCH_DISABLE),
    ),
    TableEntry::new(models!(TSM40), Operation::bare(BackendKind::Smi)),
];

/// Fn keys of the Satellite M30X, which can be enabled but not disabled.
pub const FN_KEYS_TABLE: [TableEntry; 1] = [TableEntry::new(
    models!(TSM30X),
    Operation::bare(BackendKind::Cdi)
        .writing(cdi::FN_INDEX)
        .with_steps(Some(MaskOp::Set(cdi::FN_ENABLE)), None),
)];

/// Sources enabled at probe time.
const DEFAULT_HOTKEYS: HotkeyFlags = HotkeyFlags::ONETOUCH
    .union(HotkeyFlags::MULTIMEDIA)
    .union(HotkeyFlags::FN)
    .union(HotkeyFlags::DOCK)
    .union(HotkeyFlags::FNF5);

/// Hotkey event sources.
///
/// Backends that cannot report the state are answered from the last
/// state set, which is also what [`resume`](Self::resume) restores.
#[derive(Debug)]
pub struct Hotkeys {
    binding: Binding,
    fn_keys: Option<Binding>,
    state: AtomicU32,
    supported: AtomicU32,
}

impl Hotkeys {
    /// Binds the hotkey sources and enables the default set.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] on unlisted models, backend errors while
    /// enabling.
    pub fn probe(driver: &Driver) -> Result<Self> {
        let (binding, ()) = driver.bind("hotkeys", &HOTKEYS_TABLE)?;
        let fn_keys = match driver.bind("fn_keys", &FN_KEYS_TABLE) {
            Ok((fn_keys, ())) => Some(fn_keys),
            Err(Error::NoSuchDevice) => None,
            Err(err) => return Err(err),
        };
        let hotkeys = Self {
            binding,
            fn_keys,
            state: AtomicU32::new(0),
            supported: AtomicU32::new(0),
        };
        hotkeys.set(DEFAULT_HOTKEYS)?;
        Ok(hotkeys)
    }

    /// # Errors
    ///
    /// Backend errors.
    pub fn state(&self) -> Result<Reading<HotkeyFlags>> {
        match self.binding.hotkeys_get() {
            Err(Error::NoSuchDevice) => Ok(self.cached()),
            reading => reading,
        }
    }

    fn cached(&self) -> Reading<HotkeyFlags> {
        Reading::new(
            HotkeyFlags::from_bits_retain(self.state.load(Ordering::Relaxed)),
            HotkeyFlags::from_bits_retain(self.supported.load(Ordering::Relaxed)),
        )
    }

    /// Enables the sources in `state` and disables the others, as far as
    /// the hardware allows.
    ///
    /// # Errors
    ///
    /// Backend errors; the remembered state is unchanged then.
    pub fn set(&self, state: HotkeyFlags) -> Result<()> {
        let mut supported = self.binding.hotkeys_set(state)?;
        if state.contains(HotkeyFlags::ONETOUCH) && supported.contains(HotkeyFlags::ONETOUCH) {
            info!("Enabling Hotkey buttons.");
        }

        if let Some(fn_keys) = &self.fn_keys {
            if state.contains(HotkeyFlags::FN) {
                fn_keys.toggle(true)?;
                info!("Enabling Fn keys.");
            } else {
                warn!("Disabling of Fn keys not implemented.");
            }
            supported |= HotkeyFlags::FN;
        }

        let mut kept = state & supported;
        if self.fn_keys.is_some() {
            // Once on, the Fn keys stay on.
            kept |= self.cached().state & HotkeyFlags::FN;
        }
        self.state.store(kept.bits(), Ordering::Relaxed);
        self.supported.store(supported.bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Silences the hotkeys for a suspend, keeping the remembered state.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn suspend(&self) -> Result<()> {
        self.binding.hotkeys_set(HotkeyFlags::empty()).map(|_| ())
    }

    /// Restores the remembered state.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub fn resume(&self) -> Result<()> {
        self.set(self.cached().state)
    }

    /// # Errors
    ///
    /// As [`state`](Self::state).
    pub fn status(&self) -> Result<HotkeyStatus> {
        self.state().map(HotkeyStatus)
    }
}

/// Printable hotkey state; one line per supported source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyStatus(pub Reading<HotkeyFlags>);

impl fmt::Display for HotkeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LINES: [(HotkeyFlags, &str, &str); 6] = [
            (HotkeyFlags::ONETOUCH, "Hotkey buttons", "are"),
            (HotkeyFlags::FN, "Fn keys", "are"),
            (HotkeyFlags::STICK, "Sticky Fn key", "is"),
            (HotkeyFlags::TWICE_LOCK, "Fn lock by double press", "is"),
            (HotkeyFlags::DOCK, "Dock events", "are"),
            (HotkeyFlags::FNF5, "Fn-F5 display switching", "is"),
        ];
        for (flag, name, verb) in LINES {
            if let Some(on) = self.0.get(flag) {
                writeln!(f, "{name} {verb} {}", super::enabled(on))?;
            }
        }
        Ok(())
    }
}
