//! # Driver log output
//!
//! A [`log::Log`] backend for hosting environments that have no logger of
//! their own. Every record is formatted without allocation as
//!
//! ```text
//! omnibook: [LEVEL] target: message
//! ```
//!
//! and handed to a caller supplied [`Sink`]. With the `qemu` feature,
//! [`qemu::debugcon`] provides a sink that writes to QEMU's debug console.
//!
//! ```rust,no_run
//! use log::LevelFilter;
//! use omnibook_log::DriverLogger;
//!
//! fn sink(_line: core::fmt::Arguments<'_>) {}
//!
//! static LOGGER: DriverLogger = DriverLogger::new(LevelFilter::Debug, sink);
//! LOGGER.install().expect("no other logger installed");
//! log::info!("driver up");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;

pub use logger::{DriverLogger, PREFIX, Sink};

#[cfg(all(feature = "qemu", target_arch = "x86_64"))]
pub mod qemu {
    use core::fmt::{self, Write};

    /// QEMU's `-debugcon` port.
    const QEMU_DEBUG_PORT: u16 = 0x402;

    struct DebugCon;

    impl Write for DebugCon {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for b in s.bytes() {
                unsafe {
                    core::arch::asm!(
                        "out dx, al",
                        in("dx") QEMU_DEBUG_PORT,
                        in("al") b,
                        options(nomem, nostack, preserves_flags)
                    );
                }
            }
            Ok(())
        }
    }

    /// [`Sink`](crate::Sink) writing to the QEMU debug console.
    ///
    /// Output is best effort; formatting errors are dropped.
    pub fn debugcon(line: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut DebugCon, line);
    }
}
