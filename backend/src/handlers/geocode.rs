//! HTTP handlers for place search and reverse geocoding

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use shared::{validate_coordinates, validate_search_query, Language};

use super::{cached, parse_limit, parse_or_default};
use crate::error::AppResult;
use crate::services::geocode::{DEFAULT_REVERSE_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::services::GeocodeService;
use crate::AppState;

/// Query parameters for `/geocode`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub lang: Option<String>,
}

/// Place-name search
pub async fn search_locations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let client = state.provider()?;

    let q = validate_search_query(query.q.as_deref())?;
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_SEARCH_LIMIT)?;
    let lang: Language = parse_or_default(query.lang.as_deref(), "lang")?;

    let locations = GeocodeService::new(client.clone())
        .search(&q, limit, lang)
        .await?;

    if locations.is_empty() {
        tracing::info!(query = %q, "No locations found");
    }

    Ok(cached(&state, locations))
}

/// Query parameters for `/geocode/reverse`
#[derive(Debug, Default, Deserialize)]
pub struct ReverseQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub limit: Option<String>,
    pub lang: Option<String>,
}

/// Named places at a coordinate pair
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> AppResult<Response> {
    let client = state.provider()?;

    let coords = validate_coordinates(query.lat.as_deref(), query.lon.as_deref())?;
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_REVERSE_LIMIT)?;
    let lang: Language = parse_or_default(query.lang.as_deref(), "lang")?;

    let locations = GeocodeService::new(client.clone())
        .reverse(coords.lat, coords.lon, limit, lang)
        .await?;

    Ok(cached(&state, locations))
}
