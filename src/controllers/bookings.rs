use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::BookingForm;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", post(create_booking))
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(form): Json<BookingForm>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.lifecycle.create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "id": booking.id,
            "message": "Booking request received; we will contact you with payment instructions.",
        })),
    ))
}
