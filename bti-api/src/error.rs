//! API Error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use bti_ai::AiError;
use bti_export::ExportError;
use bti_store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid password".to_string(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::Ai(e) => {
                let code = match e {
                    AiError::MalformedResponse(_) => "MALFORMED_RESPONSE",
                    AiError::Upstream { .. } | AiError::Connection(_) => "UPSTREAM_ERROR",
                };
                (StatusCode::BAD_GATEWAY, code, e.to_string())
            }
            ApiError::Store(e) => {
                let code = match e {
                    StoreError::Cleanup(_) => "CLEANUP_ERROR",
                    StoreError::Storage(_) => "STORAGE_ERROR",
                    _ => "STORE_ERROR",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
            }
            // export errors reach the API only via image post-processing of
            // client-supplied bytes, so they are the client's fault
            ApiError::Export(e) => (StatusCode::BAD_REQUEST, "COMPRESSION_ERROR", e.to_string()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
