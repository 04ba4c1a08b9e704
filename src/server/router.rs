use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{cache, health, observe, search};
use crate::state::AppState;

/// Builds the query-service router: the search form, the search and
/// cached-content endpoints, the observation hook for out-of-process
/// proxies, and a health probe.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(search::search_form))
        .route("/search", post(search::run_search))
        .route("/cache", post(cache::cached_content))
        .route("/observe", post(observe::observe))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
