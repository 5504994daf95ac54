use std::collections::HashSet;

use log::warn;

use crate::{
    messages::rpc::rpc_target::{RpcCaller, RpcTarget},
    types::RpcIndex,
    world::{
        object::replicate::Replicate,
        schema::{
            field_schema::{FieldDecl, FieldSchema, RpcDecl},
            primitive_kind::PrimitiveKind,
        },
    },
};

const MAX_RPCS: usize = RpcIndex::MAX as usize + 1;

/// Collects the ordered declarations of one replicated type.
/// Handed to [`Replicate::declare`] by the schema registry.
pub struct SchemaBuilder {
    fields: Vec<FieldDecl>,
    rpcs: Vec<RpcDecl>,
    field_names: HashSet<&'static str>,
    rpc_names: HashSet<&'static str>,
    current_type: &'static str,
}

impl SchemaBuilder {
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self {
            fields: Vec::new(),
            rpcs: Vec::new(),
            field_names: HashSet::new(),
            rpc_names: HashSet::new(),
            current_type: type_name,
        }
    }

    /// Declares the next replicated field
    pub fn field(&mut self, name: &'static str, kind: PrimitiveKind) -> &mut Self {
        if !self.field_names.insert(name) {
            warn!(
                "{} declares replicated field `{}` more than once. Lookups by name resolve to the first declaration",
                self.current_type, name
            );
        }
        self.fields.push(FieldDecl { name, kind });
        self
    }

    /// Declares the next RPC along with its routing policy
    pub fn rpc(&mut self, name: &'static str, target: RpcTarget, caller: RpcCaller) -> &mut Self {
        if self.rpcs.len() >= MAX_RPCS {
            warn!(
                "{} declares more than {} RPCs. RPC `{}` is ignored",
                self.current_type, MAX_RPCS, name
            );
            return self;
        }
        if !self.rpc_names.insert(name) {
            warn!(
                "{} declares RPC `{}` more than once. Calls by name resolve to the first declaration",
                self.current_type, name
            );
        }
        self.rpcs.push(RpcDecl {
            name,
            target,
            caller,
        });
        self
    }

    /// Runs the declaration of `B` in place, so an ancestor's fields & RPCs
    /// come before the ones declared after this call
    pub fn inherit<B: Replicate>(&mut self) -> &mut Self {
        let outer_type = self.current_type;
        self.current_type = std::any::type_name::<B>();
        B::declare(self);
        self.current_type = outer_type;
        self
    }

    pub(crate) fn build(self, type_name: &'static str) -> FieldSchema {
        FieldSchema::new(type_name, self.fields, self.rpcs)
    }
}
