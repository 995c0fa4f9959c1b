//! Error types for BTI Core

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid flow state: {0}")]
    InvalidState(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
