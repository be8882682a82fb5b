use std::{any::Any, sync::Arc};

use uuid::Uuid;

/// A component attached to a scene object
pub trait NetworkComponent: Send + Sync {
    /// Full name the component's type is registered under in the method catalog
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// An object in the active scene which can receive instance RPCs
pub trait NetworkObject: Send + Sync {
    fn guid(&self) -> Uuid;

    /// Full name the object's type is registered under in the method catalog
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Attached components, in attachment order
    fn components(&self) -> Vec<Arc<dyn NetworkComponent>>;
}

/// Looks up scene objects by their network id
pub trait ObjectDirectory: Send + Sync {
    fn find_by_guid(&self, id: &Uuid) -> Option<Arc<dyn NetworkObject>>;
}
