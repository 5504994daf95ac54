use std::collections::HashMap;

use log::error;

use crate::{
    messages::rpc::{
        error::RpcError,
        rpc_target::{RpcCaller, RpcTarget},
    },
    types::RpcIndex,
    world::{object::dirty_flags::DirtyWidth, schema::primitive_kind::PrimitiveKind},
};

/// One replicated field, in declaration order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: PrimitiveKind,
}

/// One declared RPC, in declaration order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcDecl {
    pub name: &'static str,
    pub target: RpcTarget,
    pub caller: RpcCaller,
}

/// Immutable per-type replication metadata, computed once and shared
/// through the schema registry.
///
/// Field order is the wire index of each field. Every peer must resolve an
/// identical schema for the same type, which is not checked at runtime;
/// [`FieldSchema::fingerprint`] exists so builds can be compared out of band.
#[derive(Debug)]
pub struct FieldSchema {
    type_name: &'static str,
    fields: Vec<FieldDecl>,
    rpcs: Vec<RpcDecl>,
    rpc_lookup: HashMap<&'static str, RpcIndex>,
    dirty_width: Option<DirtyWidth>,
    fingerprint: u64,
}

impl FieldSchema {
    pub(crate) fn new(type_name: &'static str, fields: Vec<FieldDecl>, rpcs: Vec<RpcDecl>) -> Self {
        let dirty_width = match DirtyWidth::for_field_count(type_name, fields.len()) {
            Ok(width) => Some(width),
            Err(err) => {
                error!("{}", err);
                None
            }
        };

        let mut rpc_lookup = HashMap::new();
        for (index, rpc) in rpcs.iter().enumerate() {
            // builder caps the rpc count at RpcIndex::MAX + 1
            let index = index as RpcIndex;
            rpc_lookup.entry(rpc.name).or_insert(index);
        }

        let fingerprint = fingerprint(&fields, &rpcs);

        Self {
            type_name,
            fields,
            rpcs,
            rpc_lookup,
            dirty_width,
            fingerprint,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&FieldDecl> {
        self.fields.get(index)
    }

    pub fn rpcs(&self) -> &[RpcDecl] {
        &self.rpcs
    }

    pub fn rpc_count(&self) -> usize {
        self.rpcs.len()
    }

    pub fn rpc(&self, index: RpcIndex) -> Option<&RpcDecl> {
        self.rpcs.get(index as usize)
    }

    /// Resolves an RPC name to its stable index
    pub fn rpc_index(&self, name: &str) -> Result<RpcIndex, RpcError> {
        self.rpc_lookup
            .get(name)
            .copied()
            .ok_or_else(|| RpcError::UnknownRpc {
                type_name: self.type_name,
                name: name.to_string(),
            })
    }

    /// Width of the dirty flag word, or None if this type declared more
    /// fields than can be tracked
    pub fn dirty_width(&self) -> Option<DirtyWidth> {
        self.dirty_width
    }

    pub fn tracking_enabled(&self) -> bool {
        self.dirty_width.is_some()
    }

    /// Hash of the ordered field & RPC declarations. The type name is left
    /// out so renaming a type does not change it.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn write_str(&mut self, value: &str) {
        self.write(value.as_bytes());
        // terminator keeps "ab"+"c" apart from "a"+"bc"
        self.write(&[0xff]);
    }
}

fn fingerprint(fields: &[FieldDecl], rpcs: &[RpcDecl]) -> u64 {
    let mut hasher = Fnv1a::new();
    for field in fields {
        hasher.write_str(field.name);
        hasher.write(&[field.kind.tag()]);
    }
    // separates an empty field list from an empty rpc list
    hasher.write(&[0xfe]);
    for rpc in rpcs {
        hasher.write_str(rpc.name);
        hasher.write(&[rpc.target.tag(), rpc.caller.tag()]);
    }
    hasher.0
}
