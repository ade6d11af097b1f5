use crate::arena::Slot;
use crate::backend::{ByteRead, ByteWrite};
use crate::{
    BackendKind, DisplayFlags, Error, HotkeyFlags, Operation, Reading, Result, WirelessFlags,
    engine,
};
use alloc::sync::Arc;
use core::fmt;

/// An operation bound to its ready backend.
///
/// Holds one user reference on the backend and whatever per-operation
/// resources the backend claimed for it; both are given back on drop.
pub struct Binding {
    slot: Arc<Slot>,
    op: Operation,
}

impl Binding {
    /// Expects the caller to hold a user reference on `slot`, which the
    /// binding takes over.
    pub(crate) fn attach(slot: Arc<Slot>, op: Operation) -> Result<Self> {
        if let Err(err) = slot.backend().attach(&op) {
            slot.release();
            return Err(err);
        }
        Ok(Self { slot, op })
    }

    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.op
    }

    #[must_use]
    pub const fn backend(&self) -> BackendKind {
        self.op.backend
    }

    fn reader(&self) -> Result<&dyn ByteRead> {
        self.slot.backend().byte_reader().ok_or(Error::NoSuchDevice)
    }

    fn writer(&self) -> Result<&dyn ByteWrite> {
        self.slot.backend().byte_writer().ok_or(Error::NoSuchDevice)
    }

    /// Reads the operation's register through its read mask.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] for write-only backends, backend errors
    /// otherwise.
    pub fn read(&self) -> Result<u8> {
        self.reader()?.byte_read(&self.op)
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] for read-only backends, backend errors
    /// otherwise.
    pub fn write(&self, value: u8) -> Result<()> {
        self.writer()?.byte_write(&self.op, value)
    }

    /// Reads another register of the same backend, unmasked.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub fn read_at(&self, addr: u32) -> Result<u8> {
        self.reader()?.byte_read(&self.op.at(addr))
    }

    /// Writes another register of the same backend.
    ///
    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub fn write_at(&self, addr: u32, value: u8) -> Result<()> {
        self.writer()?.byte_write(&self.op.at(addr), value)
    }

    /// Reads a little-endian word from `addr` and `addr + 1`.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub fn read_u16_at(&self, addr: u32) -> Result<u16> {
        let low = self.read_at(addr)?;
        let high = self.read_at(addr + 1)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Applies the on or off step as a read-modify-write.
    ///
    /// # Errors
    ///
    /// See [`engine::apply_mask`].
    pub fn apply_mask(&self, on: bool) -> Result<()> {
        engine::apply_mask(self.reader()?, self.writer()?, &self.op, on).map(|_| ())
    }

    /// Writes the on or off command byte.
    ///
    /// # Errors
    ///
    /// See [`engine::toggle`].
    pub fn toggle(&self, on: bool) -> Result<()> {
        engine::toggle(self.writer()?, &self.op, on)
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the backend has no radio control.
    pub fn wireless_get(&self) -> Result<Reading<WirelessFlags>> {
        let wireless = self.slot.backend().wireless().ok_or(Error::NoSuchDevice)?;
        wireless.wireless_get(&self.op)
    }

    /// # Errors
    ///
    /// As [`wireless_get`](Self::wireless_get).
    pub fn wireless_set(&self, state: WirelessFlags) -> Result<WirelessFlags> {
        let wireless = self.slot.backend().wireless().ok_or(Error::NoSuchDevice)?;
        wireless.wireless_set(&self.op, state)
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the backend has no display control.
    pub fn display_get(&self) -> Result<Reading<DisplayFlags>> {
        let display = self.slot.backend().display().ok_or(Error::NoSuchDevice)?;
        display.display_get(&self.op)
    }

    /// # Errors
    ///
    /// As [`display_get`](Self::display_get).
    pub fn display_set(&self, state: DisplayFlags) -> Result<DisplayFlags> {
        let display = self.slot.backend().display().ok_or(Error::NoSuchDevice)?;
        display.display_set(&self.op, state)
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the backend has no hotkey control or
    /// cannot report its state.
    pub fn hotkeys_get(&self) -> Result<Reading<HotkeyFlags>> {
        let hotkeys = self.slot.backend().hotkeys().ok_or(Error::NoSuchDevice)?;
        hotkeys.hotkeys_get(&self.op)
    }

    /// # Errors
    ///
    /// [`Error::NoSuchDevice`] if the backend has no hotkey control.
    pub fn hotkeys_set(&self, state: HotkeyFlags) -> Result<HotkeyFlags> {
        let hotkeys = self.slot.backend().hotkeys().ok_or(Error::NoSuchDevice)?;
        hotkeys.hotkeys_set(&self.op, state)
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.slot.backend().detach(&self.op);
        self.slot.release();
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("op", &self.op)
            .field("state", &self.slot.state())
            .finish()
    }
}
