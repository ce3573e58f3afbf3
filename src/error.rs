//! Error Types

use thiserror::Error;

/// Failure of a bulk check-in submit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("no check-in slots selected")]
    EmptyTargets,
    #[error("a request for this control is still in flight")]
    Busy,
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}")]
    Server { status: u16 },
    #[error("server rejected the check-in update")]
    Rejected,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("check-in store is no longer mounted")]
    StoreGone,
}

impl SyncError {
    /// Failures the user has to hear about (everything that rolled back)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SyncError::Network(_)
                | SyncError::Server { .. }
                | SyncError::Rejected
                | SyncError::MalformedResponse(_)
        )
    }
}

/// Failure while bootstrapping the page
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("page data element #{0} not found")]
    MissingElement(String),
    #[error("invalid page data: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
