use thiserror::Error;

use crate::world::schema::primitive_kind::PrimitiveKind;

/// Errors that can occur while reading or writing a replicated field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// The field index is past the end of the type's declared fields
    #[error("Field index {index} is out of range for {type_name}, which declares {field_count} replicated fields")]
    FieldOutOfRange {
        type_name: &'static str,
        index: usize,
        field_count: usize,
    },

    /// The value does not have the kind the field was declared with
    #[error("Replicated field expects a value of kind `{}`, but got `{}`", .expected.name(), .found.name())]
    KindMismatch {
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },

    /// Accessors are bound by `on_network_create` and released on despawn
    #[error("{type_name} has no bound property accessors. The object was not created on the network, or has been despawned")]
    Unbound { type_name: &'static str },
}
