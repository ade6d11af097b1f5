//! Interrupt masking around critical sections.

/// Saves and masks the local interrupt flag.
///
/// Implementations must make [`save_and_disable`](Self::save_and_disable)
/// and [`restore`](Self::restore) nest correctly: `restore` only re-enables
/// interrupts when they were enabled at the matching `save_and_disable`.
pub trait InterruptControl: Send + Sync {
    /// Disables interrupts and reports whether they were enabled before.
    fn save_and_disable(&self) -> bool;

    /// Re-enables interrupts if `were_enabled` is set.
    fn restore(&self, were_enabled: bool);
}

/// Interrupt control for environments without maskable interrupts.
///
/// Hosted builds and unit tests use this; the critical section is then
/// protected by the lock alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterrupts;

impl InterruptControl for NoInterrupts {
    #[inline]
    fn save_and_disable(&self) -> bool {
        false
    }

    #[inline]
    fn restore(&self, _were_enabled: bool) {}
}

/// `cli`/`sti` based interrupt control.
///
/// # Safety & Privilege
///
/// The methods must only be invoked where `cli`/`sti` are legal (ring 0 or
/// sufficient IOPL). Construction is therefore `unsafe`.
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
#[derive(Debug)]
pub struct X86Interrupts {
    _private: (),
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl X86Interrupts {
    /// Interrupt flag (IF) in `RFLAGS`.
    const IF: u64 = 1 << 9;

    /// # Safety
    ///
    /// The caller guarantees that the driver runs at a privilege level where
    /// `cli`, `sti` and `pushfq` are permitted.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    #[inline]
    fn rflags() -> u64 {
        let r: u64;
        unsafe { core::arch::asm!("pushfq; pop {}", out(reg) r, options(preserves_flags)) }
        r
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl InterruptControl for X86Interrupts {
    #[inline]
    fn save_and_disable(&self) -> bool {
        let enabled = Self::rflags() & Self::IF != 0;
        if enabled {
            unsafe { core::arch::asm!("cli", options(nomem, nostack, preserves_flags)) }
        }
        enabled
    }

    #[inline]
    fn restore(&self, were_enabled: bool) {
        if were_enabled {
            unsafe { core::arch::asm!("sti", options(nomem, nostack, preserves_flags)) }
        }
    }
}

/// RAII guard that masks interrupts on creation and restores them on drop.
///
/// ```
/// use omnibook_sync::{IrqGuard, NoInterrupts};
///
/// let ctl = NoInterrupts;
/// {
///     let _irq = IrqGuard::new(&ctl);
///     // interrupts masked (if the platform has any)
/// }
/// ```
pub struct IrqGuard<'a> {
    ctl: &'a dyn InterruptControl,
    /// Whether interrupts were enabled when the guard was created.
    were_enabled: bool,
}

impl<'a> IrqGuard<'a> {
    #[inline]
    #[must_use]
    pub fn new(ctl: &'a dyn InterruptControl) -> Self {
        let were_enabled = ctl.save_and_disable();
        Self { ctl, were_enabled }
    }

    /// Whether this guard will re-enable interrupts on drop.
    #[inline]
    #[must_use]
    pub const fn were_enabled(&self) -> bool {
        self.were_enabled
    }
}

impl Drop for IrqGuard<'_> {
    fn drop(&mut self) {
        self.ctl.restore(self.were_enabled);
    }
}
