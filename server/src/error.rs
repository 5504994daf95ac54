use thiserror::Error;

use tinynet_shared::{
    AccessorError, ConnectionId, NetworkId, PacketTypeError, PlayerControllerId, RpcError,
    SerdeErr,
};

/// Errors reported by [`Server`](crate::Server)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// `connect` was called twice for the same connection
    #[error("{connection} is already connected")]
    AlreadyConnected { connection: ConnectionId },

    /// The connection is not (or no longer) connected
    #[error("{connection} is not connected")]
    UnknownConnection { connection: ConnectionId },

    /// No live object has this NetworkId
    #[error("No replicated object with {network_id}")]
    UnknownObject { network_id: NetworkId },

    /// Every NetworkId has been handed out
    #[error("NetworkIds are exhausted, no more objects can be spawned")]
    NetworkIdsExhausted,

    /// Clients never send state, it only flows from the server
    #[error("{connection} sent a state update. State only flows from the server to clients")]
    StateFromClient { connection: ConnectionId },

    /// The RPC does not target the server, so clients may not send it
    #[error("{connection} sent RPC `{name}` on {network_id}, which does not target the server")]
    RpcTargetRejected {
        connection: ConnectionId,
        network_id: NetworkId,
        name: &'static str,
    },

    /// The sending connection is not allowed to call this RPC
    #[error("{connection} may not call RPC `{name}` on {network_id}")]
    RpcCallerRejected {
        connection: ConnectionId,
        network_id: NetworkId,
        name: &'static str,
    },

    /// Player controller ids must not be -1
    #[error("Player controller id {id} on {connection} is invalid")]
    InvalidPlayerController {
        connection: ConnectionId,
        id: PlayerControllerId,
    },

    #[error("{connection} already has a player controller with id {id}")]
    DuplicatePlayerController {
        connection: ConnectionId,
        id: PlayerControllerId,
    },

    #[error("{connection} already has the maximum of {max} player controllers")]
    TooManyPlayerControllers { connection: ConnectionId, max: usize },

    #[error(transparent)]
    PacketType(#[from] PacketTypeError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Accessor(#[from] AccessorError),

    #[error("Malformed packet: {0}")]
    Serde(#[from] SerdeErr),
}
