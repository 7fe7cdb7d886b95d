//! Handlers for the asset contract's record transactions.
//!
//! Each handler locks the world state for the duration of one contract call.
//! Mutating calls run inside [`MemoryWorldState::transact`] so a failed
//! transaction leaves no writes behind.
//!
//! [`MemoryWorldState::transact`]: chainav_db::MemoryWorldState::transact

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::query::{CreateAssetRequest, PageParams, QueryAssetsRequest};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-record transactions
// ---------------------------------------------------------------------------

/// POST /api/v1/assets
///
/// CreateAsset. Fails with 409 if the cid is taken and 400 on an unknown type.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAssetRequest>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("cid", &input.cid)?;

    let asset = state.ledger.lock().await.transact(|tx| {
        state
            .contract
            .create_asset(tx, &input.cid, &input.id, &input.asset_type, &input.features)
    })?;

    tracing::info!(cid = %asset.cid, asset_type = %asset.asset_type, "Asset created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets/{cid}
///
/// ReadAsset (also served as GetAsset).
pub async fn read_asset(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let ledger = state.ledger.lock().await;
    let asset = state.contract.read_asset(&*ledger, &cid)?;

    Ok(Json(DataResponse { data: asset }))
}

/// GET /api/v1/assets/{cid}/exists
pub async fn asset_exists(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let ledger = state.ledger.lock().await;
    let exists = state.contract.asset_exists(&*ledger, &cid)?;

    Ok(Json(DataResponse {
        data: json!({ "exists": exists }),
    }))
}

/// DELETE /api/v1/assets/{cid}
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .ledger
        .lock()
        .await
        .transact(|tx| state.contract.delete_asset(tx, &cid))?;

    tracing::info!(%cid, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Paginated reads
// ---------------------------------------------------------------------------

/// GET /api/v1/assets?page_size=&bookmark=
///
/// ReadAssets: every asset in cid order, one page per call.
pub async fn read_assets(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let ledger = state.ledger.lock().await;
    let page = state
        .contract
        .read_assets(&*ledger, params.page_size(), params.bookmark())?;

    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/assets/query
///
/// QueryAssets: one page of a rich query.
pub async fn query_assets(
    State(state): State<AppState>,
    Json(input): Json<QueryAssetsRequest>,
) -> AppResult<impl IntoResponse> {
    let query = input.query_string();
    let ledger = state.ledger.lock().await;
    let page = state.contract.query_assets(
        &*ledger,
        &query,
        input.page.page_size(),
        input.page.bookmark(),
    )?;

    tracing::debug!(
        fetched = page.fetched_records_count,
        bookmark = %page.bookmark,
        "Rich query page served"
    );

    Ok(Json(DataResponse { data: page }))
}
