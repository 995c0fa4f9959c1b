//! Analysis and image generation endpoints
//!
//! Thin proxies over the [`bti_ai::AnalysisProvider`]: the server holds the
//! API key, the browser never sees it.

use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bti_core::{questions, AnalysisResult, Question};
use tracing::info;

use crate::dto::{AnalyzeRequest, GenerateImageRequest, GenerateImageResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Question catalog
pub async fn get_questions() -> Json<Vec<Question>> {
    Json(questions())
}

/// Run the text analysis over a completed answer set
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalysisResult>> {
    if req.answers.is_empty() {
        return Err(ApiError::Validation("Answer set is empty".to_string()));
    }

    let result = state.ai.analyze(&req.answers).await?;
    info!(character = %result.character.name, "Analysis served");
    Ok(Json(result))
}

/// Generate the character image for an analysis prompt
pub async fn generate_image(
    State(state): State<AppState>,
    Json(req): Json<GenerateImageRequest>,
) -> ApiResult<Json<GenerateImageResponse>> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Image prompt is empty".to_string()));
    }

    let bytes = state.ai.generate_image(&req.prompt).await?;
    Ok(Json(GenerateImageResponse {
        base64_data: BASE64.encode(bytes),
    }))
}
