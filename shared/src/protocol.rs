use std::{
    any::{type_name, Any},
    collections::BTreeMap,
    sync::Arc,
};

use crate::{
    context::caller_context::CallerContext,
    messages::arguments::{FromArguments, RpcArguments},
    method::{
        catalog::{
            InstanceInvoker, MethodCatalog, MethodDescription, MethodInvoker, RpcAttributes,
            StaticInvoker, TypeDescription,
        },
        error::InvokeError,
    },
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut RpcProtocol);
}

/// Explicit registration table of every type and method that takes part in
/// RPC. Built once at startup, then locked and handed to the dispatcher as
/// its `MethodCatalog`.
#[derive(Clone, Debug, Default)]
pub struct RpcProtocol {
    types: BTreeMap<String, Arc<TypeDescription>>,
    locked: bool,
}

impl RpcProtocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    /// Registers a type with no methods yet
    pub fn add_type(&mut self, type_full_name: &str) -> &mut Self {
        self.check_lock();
        self.type_entry(type_full_name);
        self
    }

    /// Registers a static method. `A` is the parameter tuple the arguments
    /// are decoded into.
    pub fn add_static<A: FromArguments + 'static>(
        &mut self,
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&mut CallerContext, A) + Send + Sync + 'static,
    ) -> &mut Self {
        self.check_lock();
        let method = Self::static_method(type_full_name, method_name, attributes, handler);
        if let Err(error) = self.insert_method(method) {
            panic!("{}", error);
        }
        self
    }

    /// Registers an instance method invoked on targets of type `T`
    pub fn add_method<T: Any + Send + Sync, A: FromArguments + 'static>(
        &mut self,
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&T, &mut CallerContext, A) + Send + Sync + 'static,
    ) -> &mut Self {
        self.check_lock();
        let method = Self::instance_method(type_full_name, method_name, attributes, handler);
        if let Err(error) = self.insert_method(method) {
            panic!("{}", error);
        }
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(
        &mut self,
        plugin: P,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_add_type(&mut self, type_full_name: &str) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.type_entry(type_full_name);
        Ok(self)
    }

    pub fn try_add_static<A: FromArguments + 'static>(
        &mut self,
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&mut CallerContext, A) + Send + Sync + 'static,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.insert_method(Self::static_method(
            type_full_name,
            method_name,
            attributes,
            handler,
        ))?;
        Ok(self)
    }

    pub fn try_add_method<T: Any + Send + Sync, A: FromArguments + 'static>(
        &mut self,
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&T, &mut CallerContext, A) + Send + Sync + 'static,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.insert_method(Self::instance_method(
            type_full_name,
            method_name,
            attributes,
            handler,
        ))?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    fn type_entry(&mut self, type_full_name: &str) -> &mut Arc<TypeDescription> {
        self.types
            .entry(type_full_name.to_string())
            .or_insert_with(|| Arc::new(TypeDescription::new(type_full_name)))
    }

    fn insert_method(&mut self, method: MethodDescription) -> Result<(), ProtocolError> {
        let type_desc = self.type_entry(method.type_full_name());

        // statics may overload by arity, instance methods are found by name alone
        let duplicate = type_desc.methods().iter().any(|existing| {
            existing.name() == method.name()
                && existing.is_static() == method.is_static()
                && (!method.is_static() || existing.arity() == method.arity())
        });
        if duplicate {
            return Err(ProtocolError::DuplicateMethod {
                type_name: method.type_full_name().to_string(),
                method_name: method.name().to_string(),
                arity: method.arity(),
            });
        }

        Arc::make_mut(type_desc).push_method(method);
        Ok(())
    }

    fn static_method<A: FromArguments + 'static>(
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&mut CallerContext, A) + Send + Sync + 'static,
    ) -> MethodDescription {
        let invoker: StaticInvoker = Arc::new(
            move |context: &mut CallerContext,
                  arguments: &RpcArguments|
                  -> Result<(), InvokeError> {
                let parameters = A::from_arguments(arguments)?;
                handler(context, parameters);
                Ok(())
            },
        );
        MethodDescription::new(
            type_full_name,
            method_name,
            attributes,
            A::ARITY,
            MethodInvoker::Static(invoker),
        )
    }

    fn instance_method<T: Any + Send + Sync, A: FromArguments + 'static>(
        type_full_name: &str,
        method_name: &str,
        attributes: RpcAttributes,
        handler: impl Fn(&T, &mut CallerContext, A) + Send + Sync + 'static,
    ) -> MethodDescription {
        let invoker: InstanceInvoker = Arc::new(
            move |target: &dyn Any,
                  context: &mut CallerContext,
                  arguments: &RpcArguments|
                  -> Result<(), InvokeError> {
                let Some(target) = target.downcast_ref::<T>() else {
                    return Err(InvokeError::TargetType {
                        expected: type_name::<T>(),
                    });
                };
                let parameters = A::from_arguments(arguments)?;
                handler(target, context, parameters);
                Ok(())
            },
        );
        MethodDescription::new(
            type_full_name,
            method_name,
            attributes,
            A::ARITY,
            MethodInvoker::Instance(invoker),
        )
    }
}

impl MethodCatalog for RpcProtocol {
    fn types(&self) -> Vec<Arc<TypeDescription>> {
        self.types.values().cloned().collect()
    }

    fn get_type(&self, full_name: &str) -> Option<Arc<TypeDescription>> {
        self.types.get(full_name).cloned()
    }
}
