//! # Tinynet Server
//! The authoritative peer. Owns replicated objects, runs the replication
//! tick, sends state updates & RPCs to connected clients and dispatches the
//! RPCs they send back.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tinynet_shared::{
        ByteReader, ByteWrite, ByteWriter, DeliveryMode, Destination, OutgoingQueue,
        PacketSender, Serde, SerdeErr,
    };
}

mod connection;
mod error;
mod server;

pub use connection::Connection;
pub use error::ServerError;
pub use server::{Server, ServerConfig};
