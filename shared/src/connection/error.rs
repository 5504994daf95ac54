use thiserror::Error;

use tinynet_serde::SerdeErr;

/// Errors that can occur while reading the packet type of an incoming payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketTypeError {
    /// The leading byte is not a known packet type
    #[error("Unknown packet type {value}. The payload is malformed or from an incompatible build")]
    UnknownPacketType { value: u8 },

    /// The payload was empty
    #[error("Failed to read packet type: {0}")]
    Serde(#[from] SerdeErr),
}
