use bitfield_struct::bitfield;

/// Status register shared by the EC (`0x66`) and KBC (`0x64`) interfaces.
///
/// Only `OBF` and `IBF` drive the handshake; the remaining bits are decoded
/// for logging.
#[bitfield(u8, order = Lsb)]
pub struct ControllerStatus {
    /// OBF: a byte is waiting in the output buffer.
    pub output_full: bool, // 0

    /// IBF: the controller has not consumed the last byte written yet.
    pub input_full: bool, // 1

    #[bits(default = false)]
    _rsvd2: bool, // 2

    /// The last write went to the command port (0 = data port).
    pub command: bool, // 3

    /// Burst mode is active.
    pub burst: bool, // 4

    /// An SCI event is pending; the host should issue a query.
    pub sci_event: bool, // 5

    /// An SMI event is pending.
    pub smi_event: bool, // 6

    #[bits(default = false)]
    _rsvd7: bool, // 7
}
