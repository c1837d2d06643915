//! Mine safety endpoints

pub mod cache;
pub mod query;
pub mod reports;
pub mod updates;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;
use super::types::{BannerResponse, Json};

pub fn create_safety_router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/query", post(query::answer_query))
        .route("/updates", get(updates::list_updates))
        .route("/audit_report_pdf", post(reports::audit_report))
        .route("/cache/stats", get(cache::stats))
        .route("/cache/refresh", post(cache::refresh))
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Digital Mine Safety Officer API is running!".to_string(),
    })
}
