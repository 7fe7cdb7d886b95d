use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ping
///
/// Liveness check for the contract itself.
pub async fn ping(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.contract.ping()?;
    Ok(Json(DataResponse {
        data: json!({ "status": "ok" }),
    }))
}
