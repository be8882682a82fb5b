use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::{
    connection::connection_ref::ConnectionRef,
    context::caller_context::CallerContext,
    dispatch::{
        config::RpcConfig, dispatch_queue::DispatchQueue, error::DispatchError,
        outcome::DispatchOutcome, transport::RpcTransport,
    },
    messages::{
        arguments::RpcArguments, object_call::ObjectCallMessage, rpc_message::RpcMessage,
        static_call::StaticCallMessage,
    },
    method::{
        catalog::{MethodCatalog, MethodDescription, RpcAttributes},
        identifier::{split_static_identifier, static_identifier},
        method_index::MethodIndex,
    },
    scene::{
        object_directory::ObjectDirectory,
        object_resolver::{DropReason, ObjectResolver, Resolution, RpcTarget},
    },
};

/// Addresses an instance method call: a scene object, and optionally one of
/// its components by type name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectTarget {
    pub object_id: Uuid,
    pub component_type_name: Option<String>,
}

impl ObjectTarget {
    pub fn object(object_id: Uuid) -> Self {
        Self {
            object_id,
            component_type_name: None,
        }
    }

    pub fn component(object_id: Uuid, component_type_name: &str) -> Self {
        Self {
            object_id,
            component_type_name: Some(component_type_name.to_string()),
        }
    }

    fn component_name(&self) -> Option<&str> {
        self.component_type_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

impl From<&ObjectCallMessage> for ObjectTarget {
    fn from(message: &ObjectCallMessage) -> Self {
        Self {
            object_id: message.object_id,
            component_type_name: message.component_type_name.clone(),
        }
    }
}

/// How an instance call leaves this peer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcMode {
    Broadcast,
    Authority,
}

impl RpcMode {
    /// Broadcast wins when a method carries both attributes
    pub fn from_attributes(attributes: RpcAttributes) -> Option<Self> {
        if attributes.broadcast {
            Some(Self::Broadcast)
        } else if attributes.authority {
            Some(Self::Authority)
        } else {
            None
        }
    }
}

/// Routes RPCs: wraps local calls so they are mirrored to the network, and
/// turns received messages back into local invocations
pub struct Dispatcher {
    method_index: MethodIndex,
    resolver: ObjectResolver,
    transport: RwLock<Option<Arc<dyn RpcTransport>>>,
    scene: RwLock<Option<Arc<dyn ObjectDirectory>>>,
    queue: DispatchQueue,
}

impl Dispatcher {
    pub fn new(catalog: Arc<dyn MethodCatalog>, config: RpcConfig) -> Self {
        Self {
            method_index: MethodIndex::new(catalog),
            resolver: ObjectResolver::new(config.component_lookup),
            transport: RwLock::new(None),
            scene: RwLock::new(None),
            queue: DispatchQueue::new(config.max_pending_messages),
        }
    }

    pub fn method_index(&self) -> &MethodIndex {
        &self.method_index
    }

    // Session

    /// Starts a network session; wrapped calls are sent through `transport`
    pub fn connect(&self, transport: Arc<dyn RpcTransport>) -> Result<(), DispatchError> {
        *self
            .transport
            .write()
            .map_err(|_| DispatchError::RwLockPoisoned)? = Some(transport);
        info!("RPC dispatcher connected");
        Ok(())
    }

    /// Ends the network session; wrapped calls only run locally afterwards
    pub fn disconnect(&self) -> Result<(), DispatchError> {
        let previous = self
            .transport
            .write()
            .map_err(|_| DispatchError::RwLockPoisoned)?
            .take();
        if previous.is_some() {
            info!("RPC dispatcher disconnected");
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.transport().map(|t| t.is_some()).unwrap_or(false)
    }

    fn transport(&self) -> Result<Option<Arc<dyn RpcTransport>>, DispatchError> {
        Ok(self
            .transport
            .read()
            .map_err(|_| DispatchError::RwLockPoisoned)?
            .clone())
    }

    // Scene

    /// Installs the directory object calls are resolved against
    pub fn set_scene(&self, directory: Arc<dyn ObjectDirectory>) -> Result<(), DispatchError> {
        *self.scene.write().map_err(|_| DispatchError::RwLockPoisoned)? = Some(directory);
        Ok(())
    }

    pub fn clear_scene(&self) -> Result<(), DispatchError> {
        self.scene
            .write()
            .map_err(|_| DispatchError::RwLockPoisoned)?
            .take();
        Ok(())
    }

    fn scene(&self) -> Result<Option<Arc<dyn ObjectDirectory>>, DispatchError> {
        Ok(self
            .scene
            .read()
            .map_err(|_| DispatchError::RwLockPoisoned)?
            .clone())
    }

    // Reload

    /// Called after code was hot-reloaded. Indices cached so far are stale.
    pub fn hotload(&self) -> Result<(), DispatchError> {
        self.method_index.invalidate()?;
        Ok(())
    }

    /// Replaces the method catalog, e.g. with the table of freshly loaded code
    pub fn reload(&self, catalog: Arc<dyn MethodCatalog>) -> Result<(), DispatchError> {
        self.method_index.replace_catalog(catalog)?;
        info!("RPC method catalog reloaded");
        Ok(())
    }

    // Outbound

    /// Wraps a static broadcast method.
    ///
    /// Unless this call is the local body of an inbound call, a
    /// `StaticCallMessage` is broadcast first (when a session exists). Then
    /// `resume` runs the method body locally.
    pub fn wrap_static<R>(
        &self,
        context: &mut CallerContext,
        identifier: &str,
        arguments: &RpcArguments,
        resume: impl FnOnce(&mut CallerContext) -> R,
    ) -> Result<R, DispatchError> {
        if !context.is_handling_inbound() {
            if let Some(transport) = self.transport()? {
                let method_index = self.method_index.resolve_index(identifier)?;
                debug!("Broadcasting static RPC {} as index {}", identifier, method_index);
                transport.broadcast(RpcMessage::Static(StaticCallMessage::new(
                    method_index,
                    arguments.clone(),
                )));
            }
        }

        Self::run_local(context, resume)
    }

    /// Wraps an instance method marked broadcast or authority. Same shape as
    /// `wrap_static`, but the message addresses `target`.
    pub fn wrap_object<R>(
        &self,
        context: &mut CallerContext,
        target: &ObjectTarget,
        mode: RpcMode,
        method_name: &str,
        arguments: &RpcArguments,
        resume: impl FnOnce(&mut CallerContext) -> R,
    ) -> Result<R, DispatchError> {
        if !context.is_handling_inbound() {
            if let Some(transport) = self.transport()? {
                let method_index = self.method_index.resolve_index(method_name)?;
                let message = RpcMessage::Object(ObjectCallMessage::new(
                    target.object_id,
                    target.component_type_name.clone(),
                    method_index,
                    arguments.clone(),
                ));
                debug!(
                    "Sending {:?} RPC {} for {} as index {}",
                    mode, method_name, target.object_id, method_index
                );
                match mode {
                    RpcMode::Broadcast => transport.broadcast(message),
                    RpcMode::Authority => transport.send_to_authority(&target.object_id, message),
                }
            }
        }

        Self::run_local(context, resume)
    }

    fn run_local<R>(
        context: &mut CallerContext,
        resume: impl FnOnce(&mut CallerContext) -> R,
    ) -> Result<R, DispatchError> {
        let call = context.begin_local_call();
        let output = resume(context);
        context.end_local_call(call)?;
        Ok(output)
    }

    /// Calls a registered static method locally, broadcasting it first when
    /// it is marked broadcast
    pub fn call_static(
        &self,
        context: &mut CallerContext,
        type_full_name: &str,
        method_name: &str,
        arguments: &RpcArguments,
    ) -> Result<(), DispatchError> {
        let method = self.find_static_method(type_full_name, method_name, arguments.len())?;

        if !method.attributes().broadcast {
            return Ok(method.invoke_static(context, arguments)?);
        }

        let identifier = static_identifier(type_full_name, method_name);
        self.wrap_static(context, &identifier, arguments, |context| {
            method.invoke_static(context, arguments)
        })??;
        Ok(())
    }

    /// Calls a registered instance method on a local scene object, sending
    /// it to the network first when it is marked broadcast or authority
    pub fn call_object(
        &self,
        context: &mut CallerContext,
        target: &ObjectTarget,
        method_name: &str,
        arguments: &RpcArguments,
    ) -> Result<DispatchOutcome, DispatchError> {
        let resolved = match self.resolve_target(&target.object_id, target.component_name())? {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Dropped(reason) => {
                warn!("Local call to '{}' not made: {}", method_name, reason);
                return Ok(DispatchOutcome::Dropped(reason));
            }
        };
        let method = self.find_instance_method(&resolved, method_name)?;

        match RpcMode::from_attributes(method.attributes()) {
            Some(mode) => {
                self.wrap_object(context, target, mode, method_name, arguments, |context| {
                    method.invoke(resolved.as_any(), context, arguments)
                })??;
            }
            None => method.invoke(resolved.as_any(), context, arguments)?,
        }

        Ok(DispatchOutcome::Invoked)
    }

    // Inbound

    /// Dispatches a received message immediately on the calling thread
    pub fn handle_incoming(
        &self,
        context: &mut CallerContext,
        message: &RpcMessage,
        source: ConnectionRef,
    ) -> Result<DispatchOutcome, DispatchError> {
        match message {
            RpcMessage::Static(message) => {
                self.handle_static(context, message, source)?;
                Ok(DispatchOutcome::Invoked)
            }
            RpcMessage::Object(message) => self.handle_object(context, message, source),
        }
    }

    /// Invokes the static method a `StaticCallMessage` names, with `source`
    /// as the caller. Unknown types or methods are errors.
    pub fn handle_static(
        &self,
        context: &mut CallerContext,
        message: &StaticCallMessage,
        source: ConnectionRef,
    ) -> Result<(), DispatchError> {
        let identifier = self.method_index.resolve_identifier(message.method_index)?;
        let (type_name, method_name) = split_static_identifier(&identifier);
        let method = self.find_static_method(type_name, method_name, message.arguments.len())?;

        Self::with_remote_call(context, source, |context| {
            self.wrap_static(context, &identifier, &message.arguments, |context| {
                method.invoke_static(context, &message.arguments)
            })??;
            Ok(())
        })
    }

    /// Invokes the instance method an `ObjectCallMessage` names on its target.
    /// A missing object or component drops the message; an unknown method
    /// is an error.
    pub fn handle_object(
        &self,
        context: &mut CallerContext,
        message: &ObjectCallMessage,
        source: ConnectionRef,
    ) -> Result<DispatchOutcome, DispatchError> {
        let resolved = match self.resolve_target(&message.object_id, message.component())? {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Dropped(reason) => {
                warn!(
                    "Dropped RPC with index '{}' from {}: {}",
                    message.method_index, source, reason
                );
                return Ok(DispatchOutcome::Dropped(reason));
            }
        };

        let method_name = self.method_index.resolve_identifier(message.method_index)?;
        let method = self.find_instance_method(&resolved, &method_name)?;
        let target = ObjectTarget::from(message);
        let mode = RpcMode::from_attributes(method.attributes()).unwrap_or(RpcMode::Broadcast);
        debug!(
            "Invoking RPC {} on {} of object {} for {}",
            method_name,
            resolved.type_name(),
            resolved.object().guid(),
            source
        );

        Self::with_remote_call(context, source, |context| {
            self.wrap_object(context, &target, mode, &method_name, &message.arguments, |context| {
                method.invoke(resolved.as_any(), context, &message.arguments)
            })??;
            Ok(())
        })?;

        Ok(DispatchOutcome::Invoked)
    }

    fn with_remote_call<R>(
        context: &mut CallerContext,
        source: ConnectionRef,
        call: impl FnOnce(&mut CallerContext) -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
        context.begin_remote_call(source);
        let result = call(context);
        context.end_remote_call()?;
        result
    }

    /// Queues a received message for `process_incoming`. Returns false when
    /// the queue is full and the message was rejected.
    pub fn receive(&self, message: RpcMessage, source: ConnectionRef) -> bool {
        self.queue.push(message, source)
    }

    /// Dispatches every queued message in arrival order, one at a time, each
    /// with a fresh caller context
    pub fn process_incoming(&self) -> Vec<Result<DispatchOutcome, DispatchError>> {
        self.queue
            .drain()
            .into_iter()
            .map(|(message, source)| {
                let mut context = CallerContext::new();
                let result = self.handle_incoming(&mut context, &message, source);
                if let Err(error) = &result {
                    debug!("RPC from {} failed: {}", source, error);
                }
                result
            })
            .collect()
    }

    pub fn pending_messages(&self) -> usize {
        self.queue.len()
    }

    pub fn rejected_messages(&self) -> u64 {
        self.queue.rejected()
    }

    // Lookup

    fn find_static_method(
        &self,
        type_name: &str,
        method_name: &str,
        arity: usize,
    ) -> Result<Arc<MethodDescription>, DispatchError> {
        let catalog = self.method_index.catalog()?;
        let Some(type_desc) = catalog.get_type(type_name) else {
            return Err(DispatchError::UnknownType {
                type_name: type_name.to_string(),
            });
        };
        type_desc
            .find_static(method_name, arity)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownMethod {
                type_name: type_name.to_string(),
                method_name: method_name.to_string(),
            })
    }

    fn find_instance_method(
        &self,
        target: &RpcTarget,
        method_name: &str,
    ) -> Result<Arc<MethodDescription>, DispatchError> {
        let catalog = self.method_index.catalog()?;
        catalog
            .get_type(target.type_name())
            .and_then(|type_desc| type_desc.find_instance(method_name).cloned())
            .ok_or_else(|| DispatchError::UnknownMethod {
                type_name: target.type_name().to_string(),
                method_name: method_name.to_string(),
            })
    }

    fn resolve_target(
        &self,
        object_id: &Uuid,
        component: Option<&str>,
    ) -> Result<Resolution, DispatchError> {
        if object_id.is_nil() {
            return Ok(Resolution::Dropped(DropReason::NilObjectId));
        }
        let Some(scene) = self.scene()? else {
            return Ok(Resolution::Dropped(DropReason::NoActiveScene));
        };
        Ok(self.resolver.resolve(scene.as_ref(), object_id, component))
    }
}
