//! AI client error types

use thiserror::Error;

/// AI endpoint errors
#[derive(Error, Debug)]
pub enum AiError {
    /// Endpoint unreachable or returned a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure before any status was received
    #[error("Connection error: {0}")]
    Connection(String),

    /// Payload was not parseable as the expected shape, or the provider
    /// reported zero candidates/predictions
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AiError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AiError::Connection(err.to_string()),
        }
    }
}

/// Result type alias for AI operations
pub type AiResult<T> = Result<T, AiError>;
