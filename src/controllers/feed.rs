use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/feed/summary", get(get_feed_summary))
}

// GET /api/feed/summary
//
// Display-only channel data; unlike the availability read this surfaces
// upstream failure to the caller instead of degrading to empty.
async fn get_feed_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.feed.summary().await?;
    Ok(Json(summary))
}
