use crate::MaskOp;
use core::fmt;

/// The hardware access methods a table entry can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Embedded controller registers.
    Ec,
    /// Raw I/O ports.
    Pio,
    /// Keyboard controller vendor commands.
    Kbc,
    /// Methods on the ACPI embedded controller device.
    Acpi,
    /// Firmware calls through the system management interrupt.
    Smi,
    /// The Compal index/data interface at `0x300`.
    Cdi,
}

impl BackendKind {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] =
        [Self::Ec, Self::Pio, Self::Kbc, Self::Acpi, Self::Smi, Self::Cdi];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ec => "ec",
            Self::Pio => "pio",
            Self::Kbc => "i8042",
            Self::Acpi => "acpi",
            Self::Smi => "nbsmi",
            Self::Cdi => "compal",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How one feature reaches the hardware on one set of models.
///
/// Addresses are interpreted by the backend: EC register numbers, I/O port
/// numbers, CDI indices. Composite backends (ACPI, SMI) ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub backend: BackendKind,
    pub read_addr: u32,
    pub write_addr: u32,
    /// Bits kept by a read; `0` returns the raw byte.
    pub read_mask: u8,
    /// Step applied (or value written) when turning the feature on.
    pub on: Option<MaskOp>,
    /// Step applied (or value written) when turning the feature off.
    pub off: Option<MaskOp>,
}

impl Operation {
    /// An operation without addresses or masks.
    #[must_use]
    pub const fn bare(backend: BackendKind) -> Self {
        Self {
            backend,
            read_addr: 0,
            write_addr: 0,
            read_mask: 0,
            on: None,
            off: None,
        }
    }

    /// One register for reads and writes, read through `mask`.
    #[must_use]
    pub const fn simple_byte(backend: BackendKind, addr: u32, mask: u8) -> Self {
        Self {
            read_addr: addr,
            write_addr: addr,
            read_mask: mask,
            ..Self::bare(backend)
        }
    }

    /// Write-only command pair: `on` and `off` are written verbatim.
    #[must_use]
    pub const fn command(backend: BackendKind, on: u8, off: u8) -> Self {
        Self {
            on: Some(MaskOp::Set(on)),
            off: Some(MaskOp::Set(off)),
            ..Self::bare(backend)
        }
    }

    /// Replaces the on/off steps.
    #[must_use]
    pub const fn with_steps(mut self, on: Option<MaskOp>, off: Option<MaskOp>) -> Self {
        self.on = on;
        self.off = off;
        self
    }

    /// Sets `bits` to turn on and clears them to turn off.
    #[must_use]
    pub const fn switching(self, bits: u8) -> Self {
        self.with_steps(Some(MaskOp::Set(bits)), Some(MaskOp::Clear(bits)))
    }

    #[must_use]
    pub const fn reading(mut self, addr: u32) -> Self {
        self.read_addr = addr;
        self
    }

    #[must_use]
    pub const fn writing(mut self, addr: u32) -> Self {
        self.write_addr = addr;
        self
    }

    /// The same operation retargeted at register `addr`, unmasked.
    #[must_use]
    pub const fn at(self, addr: u32) -> Self {
        Self {
            read_addr: addr,
            write_addr: addr,
            read_mask: 0,
            ..self
        }
    }

    /// The step for the requested direction.
    #[must_use]
    pub const fn step(&self, on: bool) -> Option<MaskOp> {
        if on { self.on } else { self.off }
    }
}
