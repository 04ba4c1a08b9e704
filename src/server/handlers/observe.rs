use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::intercept::ObservedResponse;
use crate::state::AppState;

/// Observation hook for out-of-process proxies: one POST per completed
/// response. Always accepted; eligibility filtering and queueing happen
/// behind it and nothing about the outcome is reported back.
pub async fn observe(
    State(state): State<Arc<AppState>>,
    Json(response): Json<ObservedResponse>,
) -> impl IntoResponse {
    state.interceptor.observe(response);
    StatusCode::ACCEPTED
}
