use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers of the query service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Failure of one normalization attempt. Aborts that indexing attempt only.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Failure of an external engine invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn {binary:?}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine io: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine exited with {0}")]
    NonZeroExit(std::process::ExitStatus),
    #[error("engine record json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("engine call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
