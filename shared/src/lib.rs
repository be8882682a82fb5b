//! # Netcall Shared
//! Remote procedure calls for networked scenes: a deterministic method index,
//! call-scoped caller identity, and a dispatcher that mirrors wrapped calls
//! to the network and turns received messages back into local invocations.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use netcall_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, SignedInteger,
    SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};

mod connection;
mod context;
mod dispatch;
mod messages;
mod method;
mod protocol;
mod scene;
mod types;

pub use connection::connection_ref::ConnectionRef;
pub use context::{
    caller_context::{CallerContext, LocalCall},
    error::CallerContextError,
};
pub use dispatch::{
    config::{ComponentLookup, RpcConfig},
    dispatch_queue::DispatchQueue,
    dispatcher::{Dispatcher, ObjectTarget, RpcMode},
    error::DispatchError,
    outcome::DispatchOutcome,
    transport::RpcTransport,
};
pub use messages::{
    arguments::{FromArguments, RpcArguments},
    object_call::ObjectCallMessage,
    rpc_message::RpcMessage,
    static_call::StaticCallMessage,
    value::{FromRpcValue, RpcValue},
};
pub use method::{
    catalog::{
        InstanceInvoker, MethodCatalog, MethodDescription, MethodInvoker, RpcAttributes,
        StaticInvoker, TypeDescription,
    },
    error::{InvokeError, MethodIndexError},
    identifier::{short_type_name, split_static_identifier, static_identifier},
    method_index::{enumerate_identifiers, MethodIndex},
};
pub use protocol::{ProtocolError, ProtocolPlugin, RpcProtocol};
pub use scene::{
    object_directory::{NetworkComponent, NetworkObject, ObjectDirectory},
    object_resolver::{DropReason, ObjectResolver, Resolution, RpcTarget},
};
pub use types::{RegistryGeneration, RpcIndex};
