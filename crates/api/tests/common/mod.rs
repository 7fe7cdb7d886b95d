#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use chainav_api::config::ServerConfig;
use chainav_api::router::build_app_router;
use chainav_api::state::AppState;
use chainav_db::{MemoryWorldState, StateConfig};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        seed_on_startup: false,
    }
}

/// Build the full application router over an empty world state.
pub fn build_test_app() -> Router {
    build_test_app_with(StateConfig::default())
}

pub fn build_test_app_with(state_config: StateConfig) -> Router {
    let state = AppState::new(MemoryWorldState::new(state_config));
    build_app_router(state, &test_config())
}

/// Build the router over an empty world state with a custom server config.
pub fn build_test_app_for(config: ServerConfig) -> Router {
    build_app_router(AppState::new(MemoryWorldState::default()), &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
