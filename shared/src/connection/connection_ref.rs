use std::fmt;

use uuid::Uuid;

/// Identifies the peer a call originated from.
///
/// `Local` stands for this process; `Remote` wraps the id the transport
/// assigned to a connected peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ConnectionRef {
    #[default]
    Local,
    Remote(Uuid),
}

impl ConnectionRef {
    pub fn remote(id: Uuid) -> Self {
        Self::Remote(id)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }

    /// The connection's id. The local connection reports the nil id.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Local => Uuid::nil(),
            Self::Remote(id) => *id,
        }
    }
}

impl fmt::Display for ConnectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote(id) => write!(f, "remote({})", id),
        }
    }
}
