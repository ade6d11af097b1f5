//! # Register access primitives
//!
//! Everything the laptop backends need to talk to hardware sits in this
//! crate:
//!
//! * [`PortIo`]: the x86 I/O port space, implemented for real hardware by
//!   [`X86PortIo`] (feature `asm`) and by fakes in tests,
//! * [`Delay`]: busy-wait millisecond delays,
//! * [`IoRegions`] and [`RegionClaim`]: reservation of port ranges,
//! * [`LegacyBus`]: the embedded controller (EC, ports `0x62`/`0x66`) and
//!   keyboard controller (KBC, ports `0x60`/`0x64`) handshakes.
//!
//! ## Handshake protocol
//!
//! Both controllers expose a data port and a status/command port. Every byte
//! written must wait for the input buffer to drain (`IBF` clear), every byte
//! read must wait for the output buffer to fill (`OBF` set):
//!
//! ```text
//! EC read:   wait IBF=0, cmd 0x80, wait IBF=0, addr, wait OBF=1, read data
//! EC write:  wait IBF=0, cmd 0x81, wait IBF=0, addr, wait IBF=0, write data
//! KBC cmd:   wait IBF=0, cmd 0x59, wait IBF=0, wait IBF=0, data, wait IBF=0
//! ```
//!
//! Each wait polls the status register a bounded number of times with a
//! one millisecond pause in between and aborts the whole transaction with
//! [`PortError::Timeout`] when the budget runs out. A transaction runs under
//! one spinlock shared by both controllers, with interrupts masked.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

extern crate alloc;

mod bus;
mod delay;
mod ec;
mod error;
mod kbc;
mod port;
mod region;
mod status;

pub use bus::{Controller, DEFAULT_POLL_BUDGET, LegacyBus};
pub use delay::{Delay, PortDelay};
pub use ec::{EC_DATA_PORT, EC_STATUS_PORT, EcCommand};
pub use error::PortError;
pub use kbc::{KBC_CONTROL_CMD, KBC_DATA_PORT, KBC_STATUS_PORT};
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use port::X86PortIo;
pub use port::PortIo;
pub use region::{IoRegions, RegionClaim, Unmanaged};
pub use status::ControllerStatus;
