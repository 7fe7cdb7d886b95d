//! Convenience transactions that populate or clear a demo data set.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/seed
///
/// SeedLedger. All-or-nothing: a collision with an existing cid rolls the
/// whole seed back.
pub async fn seed_ledger(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let created = state
        .ledger
        .lock()
        .await
        .transact(|tx| state.contract.seed_ledger(tx))?;

    tracing::info!(count = created, "Ledger seeded");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: json!({ "created": created }),
        }),
    ))
}

/// DELETE /api/v1/admin/seed
///
/// DeleteSeededAssets.
pub async fn delete_seeded_assets(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let removed = state
        .ledger
        .lock()
        .await
        .transact(|tx| state.contract.delete_seeded_assets(tx))?;

    tracing::info!(count = removed, "Seeded assets deleted");

    Ok(StatusCode::NO_CONTENT)
}
