use crate::scene::object_resolver::DropReason;

/// What happened to an inbound message that did not fail
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Invoked,
    Dropped(DropReason),
}

impl DispatchOutcome {
    pub fn is_invoked(&self) -> bool {
        matches!(self, Self::Invoked)
    }
}
