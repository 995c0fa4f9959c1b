//! Store error types

use thiserror::Error;

/// Persistence and object-storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Relational transport or constraint failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Object storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Blob not found
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Retention row deletion failed after blobs were already removed
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
