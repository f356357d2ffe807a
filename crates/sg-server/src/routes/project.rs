//! `GET /project-info` — proxy to the remote analysis server's project search.

use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

/// Passes the remote status and body through on success; any remote failure
/// becomes a 500 failure envelope.
pub async fn project_info(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let found = state.remote.search_projects().await?;
    let status = StatusCode::from_u16(found.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(found.body)))
}
