//! WebAssembly module for the Weather Dashboard
//!
//! Provides client-side computation for:
//! - Display formatting (temperature, wind, humidity, UV level)
//! - Forecast normalization
//! - Input validation before a request leaves the page
//! - Location identity and proximity checks
//! - The preference/location store over `localStorage`

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod storage;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
pub use storage::{BrowserStorage, WeatherStore};

use shared::{IconSize, RawSample};

pub(crate) fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a wire enum value such as `"metric"` or `"km/h"`
fn parse_enum<T: DeserializeOwned>(value: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unsupported {}: {}", what, value)))
}

// ============================================================================
// Formatting
// ============================================================================

/// Rounded temperature with its unit symbol, e.g. `"24°C"`
#[wasm_bindgen]
pub fn temperature_label(temp: f64, units: &str) -> Result<String, JsValue> {
    let units: UnitSystem = parse_enum(units, "units")?;
    Ok(shared::format_temperature(temp, units))
}

/// Wind speed converted to the display unit, e.g. `"9.4 km/h"`
#[wasm_bindgen]
pub fn wind_speed_label(speed: f64, units: &str, display: &str) -> Result<String, JsValue> {
    let units: UnitSystem = parse_enum(units, "units")?;
    let display: WindSpeedUnit = parse_enum(display, "wind speed unit")?;
    Ok(shared::format_wind_speed(speed, units, display))
}

#[wasm_bindgen]
pub fn humidity_label(humidity: i32) -> String {
    shared::format_humidity(humidity)
}

#[wasm_bindgen]
pub fn precipitation_label(pop: f64) -> String {
    shared::format_precipitation_probability(pop)
}

#[wasm_bindgen]
pub fn pressure_label(pressure: i32) -> String {
    shared::format_pressure(pressure)
}

#[wasm_bindgen]
pub fn icon_url(code: &str, large: bool) -> String {
    let size = if large { IconSize::Large } else { IconSize::Small };
    shared::weather_icon_url(code, size)
}

/// Translation key for the UV index band, e.g. `"uvi.high"`
#[wasm_bindgen]
pub fn uvi_level_key(uvi: f64) -> String {
    shared::uvi_level(uvi).key().to_string()
}

// ============================================================================
// Normalization
// ============================================================================

/// Build the combined forecast from a current report and the interval feed.
/// Without a usable feed the result carries current conditions only.
#[wasm_bindgen]
pub fn normalize_weather(
    lat: f64,
    lon: f64,
    report_json: &str,
    samples_json: Option<String>,
) -> Result<String, JsValue> {
    let report: CurrentReport = from_json(report_json, "current report")?;
    let samples: Option<Vec<RawSample>> = samples_json
        .as_deref()
        .map(|json| from_json(json, "forecast samples"))
        .transpose()?;

    let data = shared::normalize_or_degrade(lat, lon, report, samples.as_deref());
    to_json(&data)
}

// ============================================================================
// Validation
// ============================================================================

/// True when both values parse as in-range coordinates
#[wasm_bindgen]
pub fn check_coordinates(lat: &str, lon: &str) -> bool {
    validate_coordinates(Some(lat), Some(lon)).is_ok()
}

/// True when the proxy would accept `query`
#[wasm_bindgen]
pub fn check_search_query(query: &str) -> bool {
    is_valid_search_query(query)
}

#[wasm_bindgen]
pub fn clean_search_query(query: &str) -> String {
    sanitize_input(query)
}

// ============================================================================
// Location identity
// ============================================================================

/// Proximity equality of two coordinate pairs
#[wasm_bindgen]
pub fn same_place(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> bool {
    is_near(lat_a, lon_a, lat_b, lon_b)
}

#[wasm_bindgen]
pub fn make_location_id(
    country: &str,
    name: &str,
    lat: f64,
    lon: f64,
    state: Option<String>,
) -> String {
    location_id(country, name, lat, lon, state.as_deref())
}

/// Built-in Korean cities matching `query`, as JSON
#[wasm_bindgen]
pub fn search_known_cities(query: &str) -> Result<String, JsValue> {
    to_json(&shared::search_major_cities(query))
}
