//! Generic on/off handling on top of the byte capabilities.

use crate::backend::{ByteRead, ByteWrite};
use crate::{Error, MaskOp, Operation, Result};
use log::trace;

/// Read-modify-write of `op.write_addr` with the step for `on`.
///
/// The read covers the whole byte regardless of `op.read_mask`, so bits
/// outside the step survive. Returns the value written.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the operation has no effective step for
/// that direction, before any hardware access; backend errors otherwise.
pub fn apply_mask(
    reader: &dyn ByteRead,
    writer: &dyn ByteWrite,
    op: &Operation,
    on: bool,
) -> Result<u8> {
    let step = op
        .step(on)
        .filter(|step| step.is_effective())
        .ok_or(Error::InvalidArgument)?;

    let raw = reader.byte_read(&Operation { read_mask: 0, ..*op })?;
    let value = step.apply(raw);
    writer.byte_write(op, value)?;
    trace!("{} {:#x}: {raw:#04x} -> {value:#04x}", op.backend, op.write_addr);
    Ok(value)
}

/// Writes the command byte for `on` verbatim.
///
/// # Errors
///
/// [`Error::InvalidArgument`] unless the direction carries a non-zero
/// [`MaskOp::Set`] value; backend errors otherwise.
pub fn toggle(writer: &dyn ByteWrite, op: &Operation, on: bool) -> Result<()> {
    match op.step(on) {
        Some(MaskOp::Set(value)) if value != 0 => writer.byte_write(op, value),
        _ => Err(Error::InvalidArgument),
    }
}
