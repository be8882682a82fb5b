pub mod caller_context;
pub mod error;
