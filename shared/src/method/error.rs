use thiserror::Error;

use crate::types::RpcIndex;

/// Errors that can occur while mapping method identifiers to wire indices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodIndexError {
    /// Identifier not present after a fresh enumeration of the method catalog
    #[error("Unindexed RPC method '{identifier}'. Every peer must run the same code, and the method must be registered as network-callable")]
    UnregisteredMethod { identifier: String },

    /// Index out of range after a fresh enumeration of the method catalog
    #[error("Unknown RPC method with index '{index}'. The sending peer is likely running different code")]
    UnregisteredMethodIndex { index: RpcIndex },

    /// The registry lock was poisoned by a panic on another thread
    #[error("Method index lock poisoned by a panic while it was held")]
    RwLockPoisoned,
}

/// Errors that can occur while invoking a registered method body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// Argument count does not match the method's parameter count
    #[error("Expected {expected} arguments but {actual} were supplied")]
    ArityMismatch { expected: usize, actual: usize },

    /// An argument could not be decoded as the parameter's type
    #[error("Argument {position} should be {expected} but was {actual}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// The resolved target is not of the type the method was registered on
    #[error("RPC target is not a {expected}")]
    TargetType { expected: &'static str },

    /// A static method was invoked with a target, or an instance method without one
    #[error("Method '{method_name}' is {kind} and cannot be invoked that way")]
    WrongMethodKind {
        method_name: String,
        kind: &'static str,
    },
}
