use std::fmt;

use tinynet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

/// Index of an RPC within its type's declaration order
pub type RpcIndex = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

/// The network role of the local peer, handed explicitly to every
/// synchronizer & router instead of being looked up globally
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetContext {
    host_type: HostType,
}

impl NetContext {
    pub fn new(host_type: HostType) -> Self {
        Self { host_type }
    }

    pub fn server() -> Self {
        Self::new(HostType::Server)
    }

    pub fn client() -> Self {
        Self::new(HostType::Client)
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn is_server(&self) -> bool {
        self.host_type == HostType::Server
    }

    pub fn is_client(&self) -> bool {
        self.host_type == HostType::Client
    }
}

/// Identifier the server assigns to a replicated object when it is spawned.
/// Unique for the lifetime of that spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u32);

impl NetworkId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetworkId({})", self.0)
    }
}

impl Serde for NetworkId {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        Self::const_byte_length()
    }
}

impl ConstByteLength for NetworkId {
    fn const_byte_length() -> usize {
        u32::const_byte_length()
    }
}

/// Opaque handle the transport uses for one remote peer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}
