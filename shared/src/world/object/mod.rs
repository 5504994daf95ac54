pub mod dirty_flags;
pub mod error;
pub mod net_object;
pub mod periodic_task;
pub mod property_accessor;
pub mod replicate;
pub mod replicated_object;
