use thiserror::Error;

/// Errors that can occur while resolving the schema of a replicated type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A type declared more replicated fields than the widest dirty flag word can track
    #[error("{type_name} declares {field_count} replicated fields, but at most {max} are supported. Dirty tracking is disabled for this type")]
    TooManyFields {
        type_name: &'static str,
        field_count: usize,
        max: usize,
    },
}
