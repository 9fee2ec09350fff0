//! HTTP handler for the combined weather endpoint

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use shared::{validate_coordinates, Language, UnitSystem};

use super::{cached, parse_or_default};
use crate::error::AppResult;
use crate::services::ForecastService;
use crate::AppState;

/// Query parameters for `/weather`.
///
/// Kept as raw strings so missing and malformed values map to the
/// envelope's error codes instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
    pub lang: Option<String>,
}

/// Current, hourly and daily forecast for a coordinate pair
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Response> {
    let client = state.provider()?;

    let coords = validate_coordinates(query.lat.as_deref(), query.lon.as_deref())?;
    let units: UnitSystem = parse_or_default(query.units.as_deref(), "units")?;
    let lang: Language = parse_or_default(query.lang.as_deref(), "lang")?;

    let data = ForecastService::new(client.clone())
        .forecast(coords, units, lang)
        .await?;

    Ok(cached(&state, data))
}
