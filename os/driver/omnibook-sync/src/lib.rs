//! # Driver synchronization primitives
//!
//! The hardware backends serialize register traffic with two kinds of locks:
//!
//! * [`SpinLock`] guards the short EC/KBC handshakes. It is taken together
//!   with an [`IrqGuard`] through [`SpinLock::lock_irq`] so the handshake can
//!   neither be preempted nor re-entered from an interrupt handler.
//! * [`Mutex`] guards backends whose operations may block (ACPI method
//!   evaluation, SMI mailbox traffic). Waiters can bail out early through
//!   [`Mutex::lock_interruptible`] when the calling task has a signal
//!   pending.
//!
//! [`Kref`] is the atomic reference count used for shared claims (I/O ports,
//! backend users).
//!
//! Interrupt masking is abstracted behind [`InterruptControl`] so the same
//! code runs in a kernel (feature `asm`) and in hosted test builds.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod irq;
mod kref;
mod mutex;
mod spin_lock;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use irq::X86Interrupts;
pub use irq::{InterruptControl, IrqGuard, NoInterrupts};
pub use kref::Kref;
pub use mutex::{Interrupted, Mutex, MutexGuard, NoSignals, TaskSignals};
pub use spin_lock::{SpinIrqGuard, SpinLock, SpinLockGuard};
