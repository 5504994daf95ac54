use thiserror::Error;

/// Errors that can occur while configuring a [`Protocol`](super::Protocol)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The protocol was locked by a Server or Client, or by `lock()`
    #[error("Protocol is already locked. Finish configuring it before creating a Server or Client with it")]
    AlreadyLocked,
}
