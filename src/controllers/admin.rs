use axum::{
    extract::State,
    response::IntoResponse,
    routing::patch,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::AdminOperator;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/bookings/requestPayment", patch(request_payment))
        .route("/admin/bookings/confirm", patch(confirm))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingIdRequest {
    booking_id: i64,
}

// PATCH /api/admin/bookings/requestPayment
async fn request_payment(
    State(state): State<Arc<AppState>>,
    _operator: AdminOperator,
    Json(req): Json<BookingIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.lifecycle.request_payment(req.booking_id).await?;
    Ok(Json(json!({
        "success": true,
        "status": outcome.booking.status,
        "depositAmount": outcome.deposit_due,
        "totalAmount": outcome.total_due,
        "message": format!(
            "Deposit of {} requested from {}.",
            outcome.deposit_due, outcome.booking.guest_email
        ),
    })))
}

// PATCH /api/admin/bookings/confirm
async fn confirm(
    State(state): State<Arc<AppState>>,
    _operator: AdminOperator,
    Json(req): Json<BookingIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.lifecycle.confirm(req.booking_id).await?;
    Ok(Json(json!({
        "success": true,
        "status": booking.status,
        "message": format!(
            "Booking {} confirmed; calendar dates {}..{} blocked.",
            booking.id, booking.check_in, booking.check_out
        ),
    })))
}
