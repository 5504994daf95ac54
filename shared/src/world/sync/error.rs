use thiserror::Error;

use tinynet_serde::SerdeErr;

use crate::{types::NetworkId, world::object::error::AccessorError};

/// Errors that can occur while ticking, encoding or applying object state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The object has no NetworkId yet, or has despawned
    #[error("{type_name} has no NetworkId. State can only be synchronized for spawned objects")]
    MissingIdentity { type_name: &'static str },

    /// The type declares too many fields for a dirty flag word, or its
    /// accessors are not bound
    #[error("Dirty tracking is disabled for {type_name}")]
    TrackingDisabled { type_name: &'static str },

    /// The message kind byte is not Delta or FirstSync
    #[error("Unknown state message kind {value}")]
    UnknownSyncKind { value: u8 },

    /// A set bit in the flag word does not correspond to a declared field
    #[error("Dirty flag {index} is set, but {type_name} only declares {field_count} fields")]
    UnknownField {
        type_name: &'static str,
        index: usize,
        field_count: usize,
    },

    /// The message is addressed to a different object
    #[error("State message for {found} was applied to {expected}")]
    NetworkIdMismatch {
        expected: NetworkId,
        found: NetworkId,
    },

    #[error(transparent)]
    Accessor(#[from] AccessorError),

    #[error("Malformed state message: {0}")]
    Serde(#[from] SerdeErr),
}
