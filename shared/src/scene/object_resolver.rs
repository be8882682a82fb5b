use std::{any::Any, fmt, sync::Arc};

use log::warn;
use uuid::Uuid;

use crate::{
    dispatch::config::ComponentLookup,
    method::identifier::short_type_name,
    scene::object_directory::{NetworkComponent, NetworkObject, ObjectDirectory},
};

/// The receiver of an instance RPC
#[derive(Clone)]
pub enum RpcTarget {
    Object(Arc<dyn NetworkObject>),
    Component {
        object: Arc<dyn NetworkObject>,
        component: Arc<dyn NetworkComponent>,
    },
}

impl RpcTarget {
    pub fn object(&self) -> &Arc<dyn NetworkObject> {
        match self {
            Self::Object(object) => object,
            Self::Component { object, .. } => object,
        }
    }

    /// Full type name used to find the target's methods
    pub fn type_name(&self) -> &str {
        match self {
            Self::Object(object) => object.type_name(),
            Self::Component { component, .. } => component.type_name(),
        }
    }

    pub fn as_any(&self) -> &dyn Any {
        match self {
            Self::Object(object) => object.as_any(),
            Self::Component { component, .. } => component.as_any(),
        }
    }
}

impl fmt::Debug for RpcTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => write!(f, "Object({}, {})", object.type_name(), object.guid()),
            Self::Component { object, component } => write!(
                f,
                "Component({} on {})",
                component.type_name(),
                object.guid()
            ),
        }
    }
}

/// Why an object call was dropped instead of invoked
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The message carried the nil object id
    NilObjectId,
    /// No scene directory is installed
    NoActiveScene,
    /// The object is not (or no longer) in the scene
    UnknownObject { object_id: Uuid },
    /// The object has no component with the given type name
    UnknownComponent { object_id: Uuid, component: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NilObjectId => write!(f, "unknown object (nil id)"),
            Self::NoActiveScene => write!(f, "no active scene"),
            Self::UnknownObject { object_id } => write!(f, "unknown object {}", object_id),
            Self::UnknownComponent {
                object_id,
                component,
            } => write!(f, "unknown component {} on {}", component, object_id),
        }
    }
}

#[derive(Debug)]
pub enum Resolution {
    Resolved(RpcTarget),
    Dropped(DropReason),
}

/// Finds the object, and optionally the component, an object call targets
#[derive(Clone, Debug)]
pub struct ObjectResolver {
    lookup: ComponentLookup,
}

impl ObjectResolver {
    pub fn new(lookup: ComponentLookup) -> Self {
        Self { lookup }
    }

    pub fn resolve(
        &self,
        directory: &dyn ObjectDirectory,
        object_id: &Uuid,
        component: Option<&str>,
    ) -> Resolution {
        if object_id.is_nil() {
            return Resolution::Dropped(DropReason::NilObjectId);
        }

        let Some(object) = directory.find_by_guid(object_id) else {
            return Resolution::Dropped(DropReason::UnknownObject {
                object_id: *object_id,
            });
        };

        let Some(component_name) = component.filter(|name| !name.is_empty()) else {
            return Resolution::Resolved(RpcTarget::Object(object));
        };

        match self.find_component(object.as_ref(), component_name) {
            Some(component) => Resolution::Resolved(RpcTarget::Component { object, component }),
            None => Resolution::Dropped(DropReason::UnknownComponent {
                object_id: *object_id,
                component: component_name.to_string(),
            }),
        }
    }

    fn find_component(
        &self,
        object: &dyn NetworkObject,
        name: &str,
    ) -> Option<Arc<dyn NetworkComponent>> {
        let components = object.components();

        if self.lookup == ComponentLookup::ShortOrQualified && name.contains('.') {
            return components
                .into_iter()
                .find(|component| component.type_name() == name);
        }

        let mut matches = components
            .into_iter()
            .filter(|component| short_type_name(component.type_name()) == name);
        let first = matches.next()?;
        if let Some(other) = matches.next() {
            warn!(
                "Component name '{}' on {} is ambiguous ({} and {}); using the first",
                name,
                object.guid(),
                first.type_name(),
                other.type_name()
            );
        }
        Some(first)
    }
}

impl Default for ObjectResolver {
    fn default() -> Self {
        Self::new(ComponentLookup::default())
    }
}
