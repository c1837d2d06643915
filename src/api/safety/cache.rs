use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};
use crate::infrastructure::services::CacheStats;

/// GET /cache/stats
pub async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.orchestrator().stats())
}

/// POST /cache/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let resolution = state.orchestrator().refresh(&request.query).await?;

    if let Some(warning) = &resolution.storage_warning {
        tracing::warn!(error = %warning, "Refreshed answer was not persisted");
    }

    Ok(Json(QueryResponse {
        response: resolution.value,
    }))
}
