use tinynet_serde::{ByteReader, ByteWrite, Serde};

use crate::{types::NetworkId, world::sync::error::SyncError};

/// Whether a state message carries a delta or an object's full state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncKind {
    /// Flag word, then the values of the flagged fields
    Delta,
    /// No flag word, every field in declaration order
    FirstSync,
}

impl SyncKind {
    pub fn to_byte(self) -> u8 {
        match self {
            SyncKind::Delta => 0,
            SyncKind::FirstSync => 1,
        }
    }

    pub fn from_byte(value: u8) -> Result<Self, SyncError> {
        match value {
            0 => Ok(SyncKind::Delta),
            1 => Ok(SyncKind::FirstSync),
            value => Err(SyncError::UnknownSyncKind { value }),
        }
    }
}

/// Leading fields of every state message: `[objectId:u32][messageKind:u8]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateHeader {
    pub network_id: NetworkId,
    pub kind: SyncKind,
}

impl StateHeader {
    pub fn new(network_id: NetworkId, kind: SyncKind) -> Self {
        Self { network_id, kind }
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        self.network_id.ser(writer);
        writer.write_byte(self.kind.to_byte());
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, SyncError> {
        let network_id = NetworkId::de(reader)?;
        let kind = SyncKind::from_byte(reader.read_byte()?)?;
        Ok(Self { network_id, kind })
    }
}
