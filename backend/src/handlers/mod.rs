//! HTTP handlers for the weather dashboard proxy

pub mod geocode;
pub mod health;
pub mod weather;

pub use geocode::{reverse_geocode, search_locations};
pub use health::health_check;
pub use weather::get_weather;

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ApiResponse;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Successful envelope with the shared-cache hint
fn cached<T: Serialize>(state: &AppState, data: T) -> Response {
    (
        [(header::CACHE_CONTROL, state.config.cache.header_value())],
        Json(ApiResponse::ok(data)),
    )
        .into_response()
}

/// Optional enum-valued query parameter; absent or empty means the default
fn parse_or_default<T>(value: Option<&str>, name: &str) -> AppResult<T>
where
    T: FromStr + Default,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(T::default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::invalid_params(format!("Unsupported {}: {}", name, raw))),
    }
}

/// Optional positive `limit` parameter
fn parse_limit(value: Option<&str>, default: u32) -> AppResult<u32> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| AppError::invalid_params(format!("Invalid limit: {}", raw))),
    }
}
