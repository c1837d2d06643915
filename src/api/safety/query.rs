use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};

/// POST /query
pub async fn answer_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    debug!(query_len = request.query.len(), "Answering query");

    let response = state.safety.answer_query(&request.query).await?;

    Ok(Json(QueryResponse { response }))
}
