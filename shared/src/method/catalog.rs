use std::{any::Any, fmt, sync::Arc};

use crate::{
    context::caller_context::CallerContext,
    messages::arguments::RpcArguments,
    method::{error::InvokeError, identifier::short_type_name},
};

/// Network capabilities a method was declared with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RpcAttributes {
    /// Calls are mirrored to every connected peer
    pub broadcast: bool,
    /// Calls are routed to the peer with authority over the target object
    pub authority: bool,
}

impl RpcAttributes {
    pub const NONE: Self = Self {
        broadcast: false,
        authority: false,
    };
    pub const BROADCAST: Self = Self {
        broadcast: true,
        authority: false,
    };
    pub const AUTHORITY: Self = Self {
        broadcast: false,
        authority: true,
    };

    pub fn is_network_callable(&self) -> bool {
        self.broadcast || self.authority
    }
}

pub type StaticInvoker =
    Arc<dyn Fn(&mut CallerContext, &RpcArguments) -> Result<(), InvokeError> + Send + Sync>;
pub type InstanceInvoker = Arc<
    dyn Fn(&dyn Any, &mut CallerContext, &RpcArguments) -> Result<(), InvokeError> + Send + Sync,
>;

/// The callable half of a method description
#[derive(Clone)]
pub enum MethodInvoker {
    Static(StaticInvoker),
    Instance(InstanceInvoker),
}

/// A method as seen by the dispatcher: its name, declared capabilities,
/// parameter count and a handle to invoke it
#[derive(Clone)]
pub struct MethodDescription {
    name: String,
    type_full_name: String,
    attributes: RpcAttributes,
    arity: usize,
    invoker: MethodInvoker,
}

impl MethodDescription {
    pub fn new(
        type_full_name: &str,
        name: &str,
        attributes: RpcAttributes,
        arity: usize,
        invoker: MethodInvoker,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_full_name: type_full_name.to_string(),
            attributes,
            arity,
            invoker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_full_name(&self) -> &str {
        &self.type_full_name
    }

    pub fn attributes(&self) -> RpcAttributes {
        self.attributes
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_static(&self) -> bool {
        matches!(self.invoker, MethodInvoker::Static(_))
    }

    pub fn invoke_static(
        &self,
        context: &mut CallerContext,
        arguments: &RpcArguments,
    ) -> Result<(), InvokeError> {
        let MethodInvoker::Static(invoker) = &self.invoker else {
            return Err(InvokeError::WrongMethodKind {
                method_name: self.name.clone(),
                kind: "an instance method",
            });
        };
        self.check_arity(arguments)?;
        invoker(context, arguments)
    }

    pub fn invoke(
        &self,
        target: &dyn Any,
        context: &mut CallerContext,
        arguments: &RpcArguments,
    ) -> Result<(), InvokeError> {
        let MethodInvoker::Instance(invoker) = &self.invoker else {
            return Err(InvokeError::WrongMethodKind {
                method_name: self.name.clone(),
                kind: "static",
            });
        };
        self.check_arity(arguments)?;
        invoker(target, context, arguments)
    }

    fn check_arity(&self, arguments: &RpcArguments) -> Result<(), InvokeError> {
        if arguments.len() != self.arity {
            return Err(InvokeError::ArityMismatch {
                expected: self.arity,
                actual: arguments.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for MethodDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescription")
            .field("name", &self.name)
            .field("type_full_name", &self.type_full_name)
            .field("attributes", &self.attributes)
            .field("arity", &self.arity)
            .field("is_static", &self.is_static())
            .finish()
    }
}

/// A type and the methods declared on it
#[derive(Clone, Debug)]
pub struct TypeDescription {
    full_name: String,
    methods: Vec<Arc<MethodDescription>>,
}

impl TypeDescription {
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            methods: Vec::new(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Unqualified type name
    pub fn name(&self) -> &str {
        short_type_name(&self.full_name)
    }

    pub fn methods(&self) -> &[Arc<MethodDescription>] {
        &self.methods
    }

    pub fn push_method(&mut self, method: MethodDescription) {
        self.methods.push(Arc::new(method));
    }

    /// First instance method with the given name
    pub fn find_instance(&self, name: &str) -> Option<&Arc<MethodDescription>> {
        self.methods
            .iter()
            .find(|method| !method.is_static() && method.name() == name)
    }

    /// Static method with the given name taking `arity` parameters
    pub fn find_static(&self, name: &str, arity: usize) -> Option<&Arc<MethodDescription>> {
        self.methods
            .iter()
            .find(|method| method.is_static() && method.name() == name && method.arity() == arity)
    }
}

/// Source of type & method descriptions. The dispatcher enumerates it to
/// build the method index and queries it to find invocable methods.
pub trait MethodCatalog: Send + Sync {
    /// Every known type
    fn types(&self) -> Vec<Arc<TypeDescription>>;

    /// Type by its full name
    fn get_type(&self, full_name: &str) -> Option<Arc<TypeDescription>>;
}
