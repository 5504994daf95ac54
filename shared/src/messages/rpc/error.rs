use thiserror::Error;

use tinynet_serde::SerdeErr;

use crate::{
    transport::TransportError,
    types::{NetworkId, RpcIndex},
};

/// Errors that can occur while registering, sending or invoking RPCs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The name was never declared on the type or its ancestors
    #[error("{type_name} does not declare an RPC named `{name}`")]
    UnknownRpc {
        type_name: &'static str,
        name: String,
    },

    /// The index is past the end of the type's declared RPCs
    #[error("RPC index {index} is out of range for {type_name}, which declares {rpc_count} RPCs")]
    IndexOutOfRange {
        type_name: &'static str,
        index: RpcIndex,
        rpc_count: usize,
    },

    /// No handler was registered for a declared RPC
    #[error("{type_name} has no handler registered for RPC `{name}` (index {index})")]
    UnregisteredHandler {
        type_name: &'static str,
        name: &'static str,
        index: RpcIndex,
    },

    /// The handler could not read its arguments
    #[error("Handler for RPC `{name}` on {type_name} failed to read its arguments: {source}")]
    HandlerFailed {
        type_name: &'static str,
        name: &'static str,
        #[source]
        source: SerdeErr,
    },

    /// The object has no network identity, it was not spawned or has despawned
    #[error("{type_name} has no NetworkId. The object was never spawned, or has been despawned")]
    MissingIdentity { type_name: &'static str },

    /// The message is addressed to a different object
    #[error("RPC message for {found} was delivered to {expected}")]
    NetworkIdMismatch {
        expected: NetworkId,
        found: NetworkId,
    },

    /// The RPC message itself was malformed
    #[error("Malformed RPC message: {0}")]
    Serde(#[from] SerdeErr),

    /// The transport refused the outgoing message
    #[error("Failed to send RPC: {0}")]
    Transport(#[from] TransportError),
}
