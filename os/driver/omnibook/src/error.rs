use omnibook_io::PortError;
use omnibook_sync::Interrupted;

/// Failure of a driver operation.
///
/// Every feature and backend call reports one of these; nothing in the
/// driver panics on a hardware fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The model, backend or capability is absent.
    #[error("no such device")]
    NoSuchDevice,
    /// A handshake or convergence loop ran out of time.
    #[error("timed out waiting for the hardware")]
    Timeout,
    /// The hardware or firmware rejected a request.
    #[error("I/O error: {0}")]
    Io(&'static str),
    /// The request is malformed (out-of-range value, unusable mask, ...).
    #[error("invalid argument")]
    InvalidArgument,
    #[error("out of memory")]
    OutOfMemory,
    /// A signal arrived while waiting for a backend lock.
    #[error("interrupted")]
    Interrupted,
    /// Another owner holds the resource.
    #[error("device or resource busy")]
    Busy,
}

impl From<PortError> for Error {
    fn from(err: PortError) -> Self {
        log::warn!("{err}");
        match err {
            PortError::Timeout { .. } => Self::Timeout,
        }
    }
}

impl From<Interrupted> for Error {
    fn from(_: Interrupted) -> Self {
        Self::Interrupted
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
