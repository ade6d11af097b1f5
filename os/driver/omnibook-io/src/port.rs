//! x86 I/O port space access.
//!
//! Port I/O goes through the [`PortIo`] trait so the backends can be driven
//! by simulated controllers. On hardware, [`X86PortIo`] issues the `in`/`out`
//! instructions directly.

/// Byte, word and dword access to the 16-bit I/O port space.
///
/// The methods are safe to call: whoever constructs an implementation that
/// touches real hardware vouches for the privilege level (see
/// [`X86PortIo::new`]). Individual accesses can still have arbitrary device
/// side effects, so only use port numbers the driver owns.
pub trait PortIo: Send + Sync {
    fn inb(&self, port: u16) -> u8;
    fn outb(&self, port: u16, value: u8);
    fn inw(&self, port: u16) -> u16;
    fn outw(&self, port: u16, value: u16);
    fn inl(&self, port: u16) -> u32;
    fn outl(&self, port: u16, value: u32);
}

/// Port I/O through the `in`/`out` instruction family.
///
/// # Privilege
///
/// Requires CPL 0, or an IOPL / I/O permission bitmap that grants access to
/// every port the driver uses. Violations raise `#GP`.
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
#[derive(Debug)]
pub struct X86PortIo {
    _private: (),
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl X86PortIo {
    /// # Safety
    ///
    /// The caller guarantees that the current execution context may access
    /// the I/O port space, and that no other agent concurrently drives the
    /// EC, KBC, RTC index or SMI ports without the driver's locks.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl PortIo for X86PortIo {
    #[inline]
    fn inb(&self, port: u16) -> u8 {
        let value: u8;
        unsafe {
            core::arch::asm!("in al, dx", in("dx") port, out("al") value, options(nomem, nostack, preserves_flags));
        }
        value
    }

    #[inline]
    fn outb(&self, port: u16, value: u8) {
        unsafe {
            core::arch::asm!("out dx, al", in("dx") port, in("al") value, options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn inw(&self, port: u16) -> u16 {
        let value: u16;
        unsafe {
            core::arch::asm!("in ax, dx", in("dx") port, out("ax") value, options(nomem, nostack, preserves_flags));
        }
        value
    }

    #[inline]
    fn outw(&self, port: u16, value: u16) {
        unsafe {
            core::arch::asm!("out dx, ax", in("dx") port, in("ax") value, options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn inl(&self, port: u16) -> u32 {
        let value: u32;
        unsafe {
            core::arch::asm!("in eax, dx", in("dx") port, out("eax") value, options(nomem, nostack, preserves_flags));
        }
        value
    }

    #[inline]
    fn outl(&self, port: u16, value: u32) {
        unsafe {
            core::arch::asm!("out dx, eax", in("dx") port, in("eax") value, options(nomem, nostack, preserves_flags));
        }
    }
}
