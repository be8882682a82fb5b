use thiserror::Error;

/// Errors raised when caller context begin/end calls are not balanced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallerContextError {
    /// `end_remote_call` was called while no remote call frame was on top
    #[error("end_remote_call() called without a matching begin_remote_call()")]
    NoRemoteCall,

    /// `end_local_call` was called while its local frame was not on top
    #[error("end_local_call() called out of order; local call frames must be closed innermost first")]
    UnbalancedLocalCall,
}
