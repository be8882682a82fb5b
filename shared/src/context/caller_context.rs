use log::trace;
use uuid::Uuid;

use crate::{connection::connection_ref::ConnectionRef, context::error::CallerContextError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    Root,
    Local,
    // `pending` stays set until the wrapped method body consumes it
    Remote { pending: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CallFrame {
    caller: ConnectionRef,
    kind: FrameKind,
}

/// Returned by `begin_local_call`, handed back to `end_local_call`
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalCall {
    /// The call is the local body of an inbound remote call; no frame was pushed
    ConsumedInbound,
    /// A local frame was pushed
    Pushed,
}

/// Tracks who originated the call currently executing, and whether that
/// call arrived over the network.
///
/// One context belongs to one dispatch chain and is passed down through it
/// by `&mut`, so concurrent dispatches never share caller state. Each
/// begin/end pair pushes and pops an explicit frame; ending a frame always
/// restores exactly the frame below it.
#[derive(Clone, Debug)]
pub struct CallerContext {
    frames: Vec<CallFrame>,
}

impl CallerContext {
    pub fn new() -> Self {
        Self {
            frames: vec![CallFrame {
                caller: ConnectionRef::Local,
                kind: FrameKind::Root,
            }],
        }
    }

    fn top(&self) -> &CallFrame {
        // the root frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    /// Connection that originated the call on top of the stack, or the
    /// local connection when no inbound call is active
    pub fn current_caller(&self) -> ConnectionRef {
        self.top().caller
    }

    pub fn caller_id(&self) -> Uuid {
        self.current_caller().id()
    }

    /// True between `begin_remote_call` and the wrapped body starting.
    /// Wrappers must not send to the network while this is set.
    pub fn is_handling_inbound(&self) -> bool {
        matches!(self.top().kind, FrameKind::Remote { pending: true })
    }

    /// Number of open call frames
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Called right before a wrapped method body runs.
    ///
    /// If an inbound call is pending, this is that call's local body: the
    /// pending flag is consumed and the remote caller stays current.
    /// Otherwise a local frame is pushed and the local connection becomes
    /// the caller until `end_local_call`.
    pub fn begin_local_call(&mut self) -> LocalCall {
        let frames_len = self.frames.len();
        let top = &mut self.frames[frames_len - 1];
        if let FrameKind::Remote { pending } = &mut top.kind {
            if *pending {
                *pending = false;
                return LocalCall::ConsumedInbound;
            }
        }

        self.frames.push(CallFrame {
            caller: ConnectionRef::Local,
            kind: FrameKind::Local,
        });
        LocalCall::Pushed
    }

    pub fn end_local_call(&mut self, call: LocalCall) -> Result<(), CallerContextError> {
        match call {
            LocalCall::ConsumedInbound => Ok(()),
            LocalCall::Pushed => {
                if self.top().kind != FrameKind::Local {
                    return Err(CallerContextError::UnbalancedLocalCall);
                }
                self.frames.pop();
                Ok(())
            }
        }
    }

    /// Called by the dispatcher before invoking a method that arrived from `source`
    pub fn begin_remote_call(&mut self, source: ConnectionRef) {
        self.frames.push(CallFrame {
            caller: source,
            kind: FrameKind::Remote { pending: true },
        });
    }

    /// Closes the innermost remote call and restores the caller below it.
    /// A pending flag that no wrapper consumed is discarded with the frame.
    pub fn end_remote_call(&mut self) -> Result<(), CallerContextError> {
        let FrameKind::Remote { pending } = self.top().kind else {
            return Err(CallerContextError::NoRemoteCall);
        };
        if pending {
            trace!(
                "Remote call from {} ended without reaching a wrapped method body",
                self.top().caller
            );
        }
        self.frames.pop();
        Ok(())
    }
}

impl Default for CallerContext {
    fn default() -> Self {
        Self::new()
    }
}
