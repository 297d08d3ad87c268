use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::availability::{classify, Classification};
use crate::error::ApiError;
use crate::models::RoomSelection;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/availability", get(get_availability))
        .route("/quote", get(get_quote))
        .route("/rates", get(get_rates))
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    /// Calendar month, `YYYY-MM`.
    month: String,
    /// Optional requested room ids (`rooms=1,2`); when present the response
    /// also classifies each date for that selection.
    rooms: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityResponse {
    /// date -> occupied room ids, only for dates with any occupancy.
    dates: BTreeMap<NaiveDate, Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
}

async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let first_of_month = NaiveDate::parse_from_str(&format!("{}-01", params.month), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("month must be formatted YYYY-MM".to_string()))?;

    let selection = params
        .rooms
        .as_deref()
        .map(parse_rooms_param)
        .transpose()?;

    let occupancy = state.availability.month_occupancy(first_of_month).await;
    let classification = selection.map(|sel| classify(&occupancy, sel));

    let dates: BTreeMap<NaiveDate, Vec<u8>> = occupancy
        .into_iter()
        .map(|(date, rooms)| (date, rooms.into_iter().map(|r| r.id()).collect()))
        .collect();

    Ok(Json(AvailabilityResponse {
        dates,
        classification,
    }))
}

fn parse_rooms_param(raw: &str) -> Result<RoomSelection, ApiError> {
    let ids: Vec<u8> = raw
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| ApiError::Validation("rooms must be a list of room ids".to_string()))?;
    RoomSelection::from_ids(&ids)
        .ok_or_else(|| ApiError::Validation("rooms must be 1, 2 or 1,2".to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteQuery {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if params.check_out <= params.check_in {
        return Err(ApiError::Validation(
            "checkOut must be after checkIn (minimum one night)".to_string(),
        ));
    }
    let quote = state.pricing.quote(params.check_in, params.check_out).await;
    Ok(Json(quote))
}

async fn get_rates(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let table = state.pricing.rate_table().await;
    let months: BTreeMap<u32, i64> = table.effective_months().into_iter().collect();
    Ok(Json(json!({ "months": months })))
}
