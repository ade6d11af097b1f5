/// Failure of a controller handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// A status bit did not reach the expected state within the poll budget.
    #[error("{controller}: timed out after {waited_ms} ms waiting for {condition}")]
    Timeout {
        controller: &'static str,
        condition: &'static str,
        waited_ms: u32,
    },
}
