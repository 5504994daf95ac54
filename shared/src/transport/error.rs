use thiserror::Error;

use crate::types::ConnectionId;

/// Errors a [`PacketSender`](super::PacketSender) can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The destination connection is not known to the transport
    #[error("{connection} is not connected")]
    UnknownConnection { connection: ConnectionId },

    /// This peer has no connection to a server
    #[error("No server connection is available")]
    NoServerConnection,

    /// The transport has shut down
    #[error("Transport is closed")]
    Closed,
}
