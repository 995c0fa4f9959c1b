//! Admin endpoints: auth, retention cleanup, storage/DB sync
//!
//! Cleanup and sync require a bearer token from `/api/admin/auth`. The
//! token check happens before any deletion — an expired or garbled token
//! never costs a single row.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use bti_core::constants::DEFAULT_KEEP_COUNT;
use bti_core::AdminToken;
use tracing::{info, warn};

use crate::dto::{AdminAuthRequest, AdminAuthResponse, CleanupRequest, CleanupResponse, SyncResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Exchange the admin password for a 24h token
pub async fn auth(
    State(state): State<AppState>,
    Json(req): Json<AdminAuthRequest>,
) -> ApiResult<Json<AdminAuthResponse>> {
    if state.config.admin_password.is_empty() || req.password != state.config.admin_password {
        warn!("Admin authentication failed");
        return Err(ApiError::InvalidCredentials);
    }

    let token = AdminToken::issue();
    info!("Admin authenticated");
    Ok(Json(AdminAuthResponse {
        success: true,
        token: token.encode(),
    }))
}

/// Delete the oldest reports beyond `keep_count`
pub async fn cleanup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CleanupRequest>,
) -> ApiResult<Json<CleanupResponse>> {
    require_admin(&headers)?;

    let keep_count = match req.keep_count {
        Some(n) if n < 0 => {
            return Err(ApiError::Validation(format!(
                "keep_count must be non-negative, got {}",
                n
            )))
        }
        Some(n) => n as u64,
        None => DEFAULT_KEEP_COUNT,
    };

    let outcome = state.cleanup.cleanup(keep_count).await?;

    let message = if outcome.deleted_count == 0 {
        "No cleanup needed".to_string()
    } else if outcome.fully_consistent() {
        format!("Deleted {} reports", outcome.deleted_count)
    } else {
        format!(
            "Deleted {} reports; {} blobs could not be removed",
            outcome.deleted_count,
            outcome.orphaned_blobs.len()
        )
    };

    Ok(Json(CleanupResponse {
        success: true,
        deleted_count: outcome.deleted_count,
        remaining_target: outcome.remaining_target,
        orphaned_blobs: outcome.orphaned_blobs,
        message,
    }))
}

/// Remove report rows whose backing blob no longer exists
pub async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SyncResponse>> {
    require_admin(&headers)?;

    let outcome = state.cleanup.sync_orphans().await?;
    Ok(Json(SyncResponse {
        success: true,
        storage_files: outcome.storage_files,
        db_records: outcome.db_records,
        orphans_deleted: outcome.orphans_deleted,
        final_db_count: outcome.final_db_count,
    }))
}

/// Validate the `Authorization: Bearer <token>` header
fn require_admin(headers: &HeaderMap) -> ApiResult<()> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let encoded = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Malformed authorization header".to_string()))?;

    let token = AdminToken::decode(encoded)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    if !token.is_valid() {
        return Err(ApiError::Unauthorized("Token expired".to_string()));
    }

    Ok(())
}
