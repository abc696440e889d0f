use thiserror::Error;

use crate::feed::FeedError;

/// Custom error type for the sync workflow
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Upstream fetch failed: {0}")]
    Fetch(#[from] FeedError),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A sync run is already in progress")]
    AlreadyRunning,
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
