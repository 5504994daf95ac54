//! # Tinynet Shared
//! Dirty-flag state replication & RPC routing shared between
//! tinynet-server & tinynet-client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tinynet_serde::{
    ByteReader, ByteWrite, ByteWriter, ConstByteLength, Serde, SerdeErr, MAX_STRING_BYTES,
};

mod backends;
mod connection;
mod messages;
mod protocol;
mod transport;
mod types;
mod world;

pub use backends::Timer;
pub use connection::{
    error::PacketTypeError,
    packet_type::PacketType,
    player_controller::{PlayerController, PlayerControllerId},
};
pub use messages::rpc::{
    error::RpcError,
    rpc_message::{encode_rpc_message, write_rpc_message, RpcHeader},
    rpc_router::{RpcRouter, RpcSendOutcome},
    rpc_target::{RpcCaller, RpcTarget},
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin, RegisteredType};
pub use transport::{
    error::TransportError,
    outgoing_queue::{OutgoingPacket, OutgoingQueue},
    DeliveryMode, Destination, PacketSender,
};
pub use types::{ConnectionId, HostType, NetContext, NetworkId, RpcIndex};
pub use world::{
    object::{
        dirty_flags::{DirtyFlags, DirtyWidth},
        error::AccessorError,
        net_object::NetObject,
        periodic_task::{PeriodicTask, TaskHandle},
        property_accessor::PropertyAccessor,
        replicate::Replicate,
        replicated_object::ReplicatedObject,
    },
    schema::{
        error::SchemaError,
        field_schema::{FieldDecl, FieldSchema, RpcDecl},
        primitive_kind::PrimitiveKind,
        registry::SchemaRegistry,
        replicated_value::ReplicatedValue,
        schema_builder::SchemaBuilder,
    },
    sync::{
        error::SyncError,
        state_header::{StateHeader, SyncKind},
        state_syncer::StateSynchronizer,
    },
};
