//! # Laptop platform driver core
//!
//! Drives the extra hardware of HP OmniBook, Toshiba Satellite/Tecra,
//! Fujitsu Amilo and Compal laptops: fan, backlight, batteries, radios,
//! hotkeys and friends.
//!
//! ## Structure
//!
//! * A [`ModelMask`] names the running laptop family.
//! * Each feature owns a table of [`TableEntry`]s; the first entry whose
//!   mask intersects the model selects an [`Operation`], i.e. a backend plus
//!   register addresses, a read mask and on/off [`MaskOp`] steps.
//! * Backends ([`BackendKind`]) are the access methods: the embedded
//!   controller, raw I/O ports, the keyboard controller, ACPI methods, a
//!   firmware SMI interface and an index/data port pair. Each advertises
//!   what it can do through capability traits in [`backend`].
//! * The [`Driver`] owns one slot per backend. Backends are probed when
//!   their first [`Binding`] is made and disposed when the last one drops;
//!   see [`BackendState`].
//! * [`features`] holds the adapters that turn bindings into typed
//!   operations and the classic text reports.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # fn ports() -> Arc<dyn omnibook_io::PortIo> { unimplemented!() }
//! # fn delay() -> Arc<dyn omnibook_io::Delay> { unimplemented!() }
//! use omnibook::features::Features;
//! use omnibook::{Driver, DriverConfig, ModelMask, Platform};
//!
//! let driver = Driver::new(
//!     DriverConfig::new(ModelMask::XE3GF),
//!     Platform::new(ports(), delay()),
//! );
//! let features = Features::probe(&driver);
//! if let Some(ac) = &features.ac {
//!     print!("{}", ac.status().unwrap());
//! }
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

extern crate alloc;

mod arena;
pub mod backend;
mod binding;
mod config;
mod driver;
pub mod engine;
mod error;
pub mod features;
mod flags;
mod mask;
mod model;
mod operation;
pub mod platform;
pub mod registers;
pub mod table;

pub use arena::BackendState;
pub use binding::Binding;
pub use config::DriverConfig;
pub use driver::Driver;
pub use error::{Error, Result};
pub use flags::{DisplayFlags, HotkeyFlags, Reading, WirelessFlags};
pub use mask::MaskOp;
pub use model::ModelMask;
pub use operation::{BackendKind, Operation};
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use platform::X86SmiTrap;
pub use platform::{
    AcpiFault, AcpiHandle, AcpiHost, AcpiValue, HostEc, PciBus, PciDevice, Platform, SmiTrap,
};
pub use table::TableEntry;
