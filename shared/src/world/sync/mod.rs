pub mod error;
pub mod state_header;
pub mod state_syncer;
