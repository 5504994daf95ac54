use tinynet_serde::{ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr};

use crate::types::{NetworkId, RpcIndex};

/// Leading fields of every RPC message: `[objectId:u32][rpcIndex:u16]`.
/// The raw argument bytes follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcHeader {
    pub network_id: NetworkId,
    pub rpc_index: RpcIndex,
}

impl RpcHeader {
    pub fn new(network_id: NetworkId, rpc_index: RpcIndex) -> Self {
        Self {
            network_id,
            rpc_index,
        }
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        self.network_id.ser(writer);
        self.rpc_index.ser(writer);
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let network_id = NetworkId::de(reader)?;
        let rpc_index = RpcIndex::de(reader)?;
        Ok(Self {
            network_id,
            rpc_index,
        })
    }
}

/// Writes a complete RPC message
pub fn write_rpc_message(writer: &mut dyn ByteWrite, header: &RpcHeader, args: &[u8]) {
    header.write(writer);
    writer.write_bytes(args);
}

/// Encodes a complete RPC message into a fresh buffer
pub fn encode_rpc_message(header: &RpcHeader, args: &[u8]) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(6 + args.len());
    write_rpc_message(&mut writer, header, args);
    writer.to_bytes()
}
