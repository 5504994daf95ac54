use std::any::Any;

use crate::world::{
    object::error::AccessorError,
    schema::{replicated_value::ReplicatedValue, schema_builder::SchemaBuilder},
};

/// A type whose fields & RPCs are replicated over the network.
///
/// `declare` lists the replicated fields and RPCs in a fixed order. That
/// order is the wire layout, so it must be identical on every peer.
/// `read_field` and `write_field` address fields by the same index.
///
/// ```ignore
/// impl Replicate for Pawn {
///     fn declare(schema: &mut SchemaBuilder) {
///         schema
///             .field("x", PrimitiveKind::Int32)
///             .field("y", PrimitiveKind::Int32)
///             .rpc("Shoot", RpcTarget::Server, RpcCaller::ClientOwner);
///     }
///
///     fn read_field(&self, index: usize) -> Option<ReplicatedValue> {
///         match index {
///             0 => Some(self.x.into()),
///             1 => Some(self.y.into()),
///             _ => None,
///         }
///     }
///
///     fn write_field(&mut self, index: usize, value: ReplicatedValue) -> Result<(), AccessorError> {
///         match index {
///             0 => self.x = value.try_into()?,
///             1 => self.y = value.try_into()?,
///             _ => return Err(AccessorError::FieldOutOfRange { type_name: "Pawn", index, field_count: 2 }),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Replicate: Any {
    /// Declares fields & RPCs, in wire order. Runs once per type.
    fn declare(schema: &mut SchemaBuilder)
    where
        Self: Sized;

    /// Current value of the field at `index`, or None if out of range
    fn read_field(&self, index: usize) -> Option<ReplicatedValue>;

    /// Overwrites the field at `index`
    fn write_field(&mut self, index: usize, value: ReplicatedValue) -> Result<(), AccessorError>;
}
