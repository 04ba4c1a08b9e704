use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();
    Json(json!({
        "status": "ok",
        "collection": state.settings.engine.collection,
        "cached_documents": state.cache.len(),
        "submitted": state.pipeline.submitted(),
        "dropped_submissions": state.pipeline.dropped(),
        "uptime_secs": uptime_secs,
    }))
}
