pub mod object;
pub mod schema;
pub mod sync;
