use axum::extract::{Query, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UpdateView, UpdatesParams, UpdatesResponse};

/// GET /updates?limit=N
pub async fn list_updates(
    State(state): State<AppState>,
    Query(params): Query<UpdatesParams>,
) -> Result<Json<UpdatesResponse>, ApiError> {
    let analyzed = state.safety.analyze_updates(params.limit).await?;

    Ok(Json(UpdatesResponse {
        updates: analyzed.into_iter().map(UpdateView::from).collect(),
    }))
}
