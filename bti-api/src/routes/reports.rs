//! Report persistence and gallery endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bti_core::constants::{DEFAULT_COMPRESS_QUALITY, MAX_COMPRESSED_IMAGE_BYTES};
use bti_core::{NewReport, Report};
use bti_export::{compress_jpeg_bounded, decode_data_url};
use tracing::info;
use uuid::Uuid;

use crate::dto::SaveReportRequest;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Persist a report: recompress the image, upload the blob under a fresh
/// uuid name, then insert the row. Blob first — a row must never point at
/// an image that was not stored.
pub async fn save_report(
    State(state): State<AppState>,
    Json(req): Json<SaveReportRequest>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    if req.character.name.trim().is_empty() {
        return Err(ApiError::Validation("Character name is empty".to_string()));
    }
    if req.strengths.is_empty() {
        return Err(ApiError::Validation("Strengths list is empty".to_string()));
    }

    let raw = decode_image_payload(&req.image_base64)?;
    let jpeg = compress_jpeg_bounded(&raw, DEFAULT_COMPRESS_QUALITY, MAX_COMPRESSED_IMAGE_BYTES)?;

    let blob_name = format!("{}.jpg", Uuid::new_v4());
    let image_url = state.images.upload(&jpeg, &blob_name).await?;

    let report = state
        .repo
        .insert(NewReport {
            character: req.character,
            slogan: req.slogan,
            strengths: req.strengths,
            growth_point: req.growth_point,
            image_url,
            blob_name,
        })
        .await?;

    info!(report_id = %report.id, "Report saved");
    Ok((StatusCode::CREATED, Json(report)))
}

/// Gallery listing, newest first, no pagination
pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<Report>>> {
    let reports = state.repo.list().await?;
    Ok(Json(reports))
}

/// Serve a stored image blob
pub async fn get_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let bytes = state.images.download(&name).await.map_err(|e| match e {
        bti_store::StoreError::NotFound(name) => {
            ApiError::NotFound(format!("Image {} not found", name))
        }
        other => ApiError::Store(other),
    })?;

    let content_type = if name.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    };

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Accept either a raw base64 payload or a full `data:` URL
fn decode_image_payload(payload: &str) -> ApiResult<Vec<u8>> {
    if payload.starts_with("data:") {
        return Ok(decode_data_url(payload)?);
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| ApiError::Validation(format!("Image payload is not base64: {}", e)))
}
