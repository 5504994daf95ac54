pub mod error;
pub mod rpc_message;
pub mod rpc_router;
pub mod rpc_target;
