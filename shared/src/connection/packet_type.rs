// The kind of message a packet carries. Written as the first byte of every
// payload handed to the transport.

use tinynet_serde::{ByteReader, ByteWrite};

use crate::connection::error::PacketTypeError;

#[derive(Copy, Debug, Clone, Eq, PartialEq)]
pub enum PacketType {
    // Delta or first-sync state for one object
    StateUpdate,
    // One RPC call on one object
    Rpc,
}

impl PacketType {
    pub fn to_byte(self) -> u8 {
        match self {
            PacketType::StateUpdate => 0,
            PacketType::Rpc => 1,
        }
    }

    pub fn from_byte(byte: u8) -> Result<Self, PacketTypeError> {
        match byte {
            0 => Ok(PacketType::StateUpdate),
            1 => Ok(PacketType::Rpc),
            // malformed or hostile input, never panic on it
            value => Err(PacketTypeError::UnknownPacketType { value }),
        }
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.to_byte());
    }

    /// Reads the leading packet type of a payload, leaving the reader at the
    /// start of the message
    pub fn read(reader: &mut ByteReader) -> Result<Self, PacketTypeError> {
        let byte = reader.read_byte()?;
        Self::from_byte(byte)
    }
}
