//! API route handlers

pub mod admin;
pub mod analyze;
pub mod health;
pub mod reports;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Quiz & analysis
        .route("/api/questions", get(analyze::get_questions))
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/generate-image", post(analyze::generate_image))
        // Reports
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::save_report),
        )
        .route("/images/:name", get(reports::get_image))
        // Admin
        .route("/api/admin/auth", post(admin::auth))
        .route("/api/admin/cleanup", post(admin::cleanup))
        .route("/api/admin/sync", post(admin::sync))
        // State
        .with_state(state)
}
