use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chainav_core::error::CoreError;
use chainav_core::state::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for contract failures and adds request validation.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure raised by a contract handler.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a contract error into an HTTP status, error code, and message.
///
/// Caller mistakes keep their message; encoding and store faults are logged
/// and answered with a sanitized 500.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::AlreadyExists { .. } => (StatusCode::CONFLICT, "ALREADY_EXISTS", err.to_string()),
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::InvalidEnumValue { .. } => (
            StatusCode::BAD_REQUEST,
            "INVALID_ENUM_VALUE",
            err.to_string(),
        ),
        CoreError::StoreRead {
            source: source @ (StoreError::InvalidQuery(_) | StoreError::RichQueryUnsupported),
            ..
        } => (StatusCode::BAD_REQUEST, "INVALID_QUERY", source.to_string()),
        CoreError::Encoding { .. } => {
            tracing::error!(op = ?err.op(), error = %err, "Asset encoding failed");
            internal("ENCODING_ERROR")
        }
        CoreError::Decoding { .. } => {
            tracing::error!(op = ?err.op(), error = %err, "Stored asset could not be decoded");
            internal("DECODING_ERROR")
        }
        CoreError::StoreRead { .. } | CoreError::StoreWrite { .. } => {
            tracing::error!(op = ?err.op(), error = %err, "World state error");
            internal("STORE_ERROR")
        }
    }
}

fn internal(code: &'static str) -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        "An internal error occurred".to_string(),
    )
}
