//! # Tinynet Client
//! Mirrors the objects a server replicates. Applies the state updates it
//! receives, dispatches server RPCs to local handlers and sends RPCs back.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use tinynet_shared::{
        ByteReader, ByteWrite, ByteWriter, DeliveryMode, Destination, OutgoingQueue,
        PacketSender, Serde, SerdeErr,
    };
}

mod client;
mod client_config;
mod error;
mod world;

pub use client::Client;
pub use client_config::ClientConfig;
pub use error::ClientError;
