use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CacheForm {
    pub id: String,
}

/// Serves the full rendered document cached for an id by a prior search.
pub async fn cached_content(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CacheForm>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .cache
        .get(&form.id)
        .ok_or_else(|| ApiError::NotFound(format!("no cached document for {}", form.id)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    ))
}
