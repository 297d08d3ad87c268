use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::models::BookingStatus;
use crate::store::StoreError;

/// Externally visible failure taxonomy. The two lifecycle variants are
/// expected, frequent outcomes (a double-clicked admin button), not
/// exceptional conditions; they map to 409 and carry enough context for a
/// human-readable message and nothing else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("operator authorization required")]
    Authorization,
    #[error("booking {0} not found")]
    NotFound(i64),
    #[error("booking {id} is {current}, expected {expected}")]
    InvalidState {
        id: i64,
        current: BookingStatus,
        expected: BookingStatus,
    },
    #[error("booking {0} is already confirmed")]
    AlreadyConfirmed(i64),
    #[error("upstream service unavailable: {0}")]
    ExternalService(String),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Authorization => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } | ApiError::AlreadyConfirmed(_) => StatusCode::CONFLICT,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps store failures from the payment transition, where only a
    /// `pending` record may be claimed.
    pub fn from_payment_claim(id: i64, err: StoreError) -> ApiError {
        match err {
            StoreError::NotFound => ApiError::NotFound(id),
            StoreError::StaleState { current } => ApiError::InvalidState {
                id,
                current,
                expected: BookingStatus::Pending,
            },
            other => ApiError::Internal(other.into()),
        }
    }

    /// Maps store failures from the confirmation transition, where any
    /// status but `confirmed` may be claimed.
    pub fn from_confirmation_claim(id: i64, err: StoreError) -> ApiError {
        match err {
            StoreError::NotFound => ApiError::NotFound(id),
            StoreError::StaleState { .. } => ApiError::AlreadyConfirmed(id),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            if let ApiError::Internal(source) = &self {
                error!("internal error: {source:?}");
            }
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_conflicts_map_to_409() {
        let err = ApiError::from_payment_claim(
            7,
            StoreError::StaleState {
                current: BookingStatus::AwaitingPayment,
            },
        );
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(matches!(err, ApiError::InvalidState { id: 7, .. }));

        let err = ApiError::from_confirmation_claim(
            7,
            StoreError::StaleState {
                current: BookingStatus::Confirmed,
            },
        );
        assert!(matches!(err, ApiError::AlreadyConfirmed(7)));
    }

    #[test]
    fn missing_records_map_to_404() {
        let err = ApiError::from_payment_claim(3, StoreError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
