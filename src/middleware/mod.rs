use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::ApiError;

/// Proof that the caller is the authorized operator. Extracting it checks a
/// bearer token against the configured admin token; on failure nothing about
/// any record is disclosed, just a 401.
#[derive(Debug, Clone, Copy)]
pub struct AdminOperator;

impl FromRequestParts<Arc<crate::AppState>> for AdminOperator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Authorization)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Authorization)?;

        if token != state.config.admin.token {
            return Err(ApiError::Authorization);
        }

        Ok(AdminOperator)
    }
}
