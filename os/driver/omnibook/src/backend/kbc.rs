use super::{Backend, ByteWrite, HotkeyControl};
use crate::engine::toggle;
use crate::{BackendKind, HotkeyFlags, Operation, Result};
use alloc::sync::Arc;
use omnibook_io::LegacyBus;

/// Keyboard controller vendor commands. Write-only.
pub struct KbcBackend {
    bus: Arc<LegacyBus>,
}

impl KbcBackend {
    #[must_use]
    pub fn new(bus: Arc<LegacyBus>) -> Self {
        Self { bus }
    }
}

impl Backend for KbcBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Kbc
    }

    fn byte_writer(&self) -> Option<&dyn ByteWrite> {
        Some(self)
    }

    fn hotkeys(&self) -> Option<&dyn HotkeyControl> {
        Some(self)
    }
}

/// Sends the control command followed by `value`; the address is unused.
impl ByteWrite for KbcBackend {
    fn byte_write(&self, _op: &Operation, value: u8) -> Result<()> {
        Ok(self.bus.kbc_control(value)?)
    }
}

/// OneTouch buttons through the operation's command pair.
impl HotkeyControl for KbcBackend {
    fn hotkeys_set(&self, op: &Operation, state: HotkeyFlags) -> Result<HotkeyFlags> {
        toggle(self, op, state.contains(HotkeyFlags::ONETOUCH))?;
        Ok(HotkeyFlags::ONETOUCH)
    }
}
