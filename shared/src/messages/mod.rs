pub mod arguments;
pub mod object_call;
pub mod rpc_message;
pub mod static_call;
pub mod value;
