pub mod error;
pub mod field_schema;
pub mod primitive_kind;
pub mod registry;
pub mod replicated_value;
pub mod schema_builder;
