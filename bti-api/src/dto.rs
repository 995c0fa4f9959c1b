//! Request/response bodies for the API

use bti_core::{AnswerSet, Character, GrowthPoint};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Analysis request: a completed answer set
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub answers: AnswerSet,
}

/// Image generation request
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// Image generation response: raw image bytes, base64-encoded
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub base64_data: String,
}

/// Report save request. The image arrives as base64 (raw or `data:` URL)
/// and is recompressed server-side before upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveReportRequest {
    pub character: Character,
    pub slogan: String,
    pub strengths: Vec<String>,
    pub growth_point: GrowthPoint,
    pub image_base64: String,
}

/// Admin authentication request
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminAuthRequest {
    pub password: String,
}

/// Admin authentication response
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminAuthResponse {
    pub success: bool,
    pub token: String,
}

/// Cleanup request. `keep_count` is signed so a negative value can be
/// rejected with a validation error instead of a deserialization failure;
/// omitting it falls back to the service default.
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupRequest {
    #[serde(default)]
    pub keep_count: Option<i64>,
}

/// Cleanup response
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub remaining_target: u64,
    pub orphaned_blobs: Vec<String>,
    pub message: String,
}

/// Storage/DB sync response
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub storage_files: u64,
    pub db_records: u64,
    pub orphans_deleted: u64,
    pub final_db_count: u64,
}
