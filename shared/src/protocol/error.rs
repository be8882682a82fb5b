use thiserror::Error;

/// Errors that can occur while building an RPC protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. RpcProtocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// A method with the same name (and, for statics, the same arity) is already registered on the type
    #[error("Method '{method_name}' with {arity} parameters is already registered on {type_name}")]
    DuplicateMethod {
        type_name: String,
        method_name: String,
        arity: usize,
    },
}
