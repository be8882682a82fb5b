use std::default::Default;

/// How an object call's component type name is matched against the
/// components attached to the target object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ComponentLookup {
    /// First component whose unqualified type name matches
    ShortName,
    /// A name containing `.` must equal a component's full type name;
    /// any other name falls back to `ShortName` matching
    #[default]
    ShortOrQualified,
}

/// Contains Config properties which will be used by the Dispatcher
#[derive(Clone, Debug)]
pub struct RpcConfig {
    /// Used to pick the component an object call targets
    pub component_lookup: ComponentLookup,
    /// Maximum number of received messages waiting in the inbound queue.
    /// Messages received past this limit are rejected.
    pub max_pending_messages: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            component_lookup: ComponentLookup::default(),
            max_pending_messages: 1024,
        }
    }
}
