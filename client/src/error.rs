use thiserror::Error;

use tinynet_shared::{AccessorError, NetworkId, PacketTypeError, RpcError, SerdeErr, SyncError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{network_id} is already spawned")]
    AlreadySpawned { network_id: NetworkId },

    #[error("No replicated object with {network_id}")]
    UnknownObject { network_id: NetworkId },

    /// The server sent an RPC that only the server may receive
    #[error("Received RPC `{name}` on {network_id}, which targets the server")]
    RpcTargetRejected {
        network_id: NetworkId,
        name: &'static str,
    },

    #[error(transparent)]
    PacketType(#[from] PacketTypeError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Accessor(#[from] AccessorError),

    #[error("Malformed packet: {0}")]
    Serde(#[from] SerdeErr),
}
