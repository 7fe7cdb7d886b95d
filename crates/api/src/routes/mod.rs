pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route is one contract transaction:
///
/// ```text
/// /ping                      Ping (GET)
///
/// /assets                    ReadAssets (GET), CreateAsset (POST)
/// /assets/query              QueryAssets (POST)
/// /assets/{cid}              ReadAsset (GET), DeleteAsset (DELETE)
/// /assets/{cid}/exists       AssetExists (GET)
///
/// /admin/seed                SeedLedger (POST), DeleteSeededAssets (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::ping::ping))
        .route(
            "/assets",
            get(handlers::assets::read_assets).post(handlers::assets::create_asset),
        )
        .route("/assets/query", post(handlers::assets::query_assets))
        .route(
            "/assets/{cid}",
            get(handlers::assets::read_asset).delete(handlers::assets::delete_asset),
        )
        .route("/assets/{cid}/exists", get(handlers::assets::asset_exists))
        .route(
            "/admin/seed",
            post(handlers::seed::seed_ledger).delete(handlers::seed::delete_seeded_assets),
        )
}
