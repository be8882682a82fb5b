use thiserror::Error;

use crate::{context::error::CallerContextError, method::error::{InvokeError, MethodIndexError}};

/// Errors raised by the dispatcher. These indicate mismatched code between
/// peers or a programming error; expected races (destroyed objects, late
/// messages) are dropped with a log line instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Method index error
    #[error("Method index error: {0}")]
    Index(#[from] MethodIndexError),

    /// Type named by a static call is not in the catalog
    #[error("Unknown Static RPC type '{type_name}'")]
    UnknownType { type_name: String },

    /// Method not found on the resolved type
    #[error("Unknown RPC method '{method_name}' on {type_name}")]
    UnknownMethod {
        type_name: String,
        method_name: String,
    },

    /// Invocation error
    #[error("Invoke error: {0}")]
    Invoke(#[from] InvokeError),

    /// Caller context error
    #[error("Caller context error: {0}")]
    Context(#[from] CallerContextError),

    /// A dispatcher lock was poisoned by a panic while it was held
    #[error("Dispatcher lock poisoned by a panic while it was held")]
    RwLockPoisoned,
}
