//! Location identity and proximity

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Language;

/// Two coordinates closer than this on both axes name the same place
pub const PROXIMITY_DEGREES: f64 = 0.001;

/// Country whose results are listed first in search results
pub const PREFERRED_COUNTRY: &str = "KR";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Raw geocoding record from the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_names: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A place the dashboard can show weather for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationInfo {
    /// Build a location from a geocoding record.
    ///
    /// The display name prefers the localized name for `language`; the id is
    /// always derived from the provider's canonical name so repeated searches
    /// in either language produce the same id. Records without coordinates
    /// yield `None`.
    pub fn from_geocode(result: &GeocodeResult, language: Language) -> Option<Self> {
        let lat = result.lat?;
        let lon = result.lon?;
        let canonical = result.name.as_deref().unwrap_or("unknown");
        let display = result
            .local_names
            .as_ref()
            .and_then(|names| names.get(language.code()))
            .map(String::as_str)
            .unwrap_or(canonical);
        let country = result
            .country
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("??");
        let state = result.state.as_deref().filter(|s| !s.is_empty());

        Some(Self {
            id: location_id(country, canonical, lat, lon, state),
            name: display.to_string(),
            state: state.map(str::to_string),
            country: country.to_string(),
            lat,
            lon,
        })
    }

    /// Placeholder for a device position with no geocoded name
    pub fn current_position(lat: f64, lon: f64, language: Language) -> Self {
        let name = match language {
            Language::Korean => "현재 위치",
            Language::English => "Current location",
        };
        Self {
            id: format!("current-{}-{}", lat, lon),
            name: name.to_string(),
            state: None,
            country: String::new(),
            lat,
            lon,
        }
    }

    /// Proximity equality: both axes within [`PROXIMITY_DEGREES`]
    pub fn is_same_place(&self, other: &LocationInfo) -> bool {
        is_near(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Proximity check on raw coordinates
pub fn is_near(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> bool {
    (lat_a - lat_b).abs() < PROXIMITY_DEGREES && (lon_a - lon_b).abs() < PROXIMITY_DEGREES
}

/// Synthetic identifier:
/// `{country}-{name}-{lat}-{lon}[-{state}]`, lowercased, whitespace runs as
/// hyphens, coordinates rounded to 6 decimals in shortest form.
pub fn location_id(country: &str, name: &str, lat: f64, lon: f64, state: Option<&str>) -> String {
    let mut id = format!(
        "{}-{}-{}-{}",
        country.to_lowercase(),
        slug(name),
        round_coordinate(lat),
        round_coordinate(lon)
    );
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        id.push('-');
        id.push_str(&slug(state));
    }
    id
}

fn slug(value: &str) -> String {
    WHITESPACE.replace_all(&value.to_lowercase(), "-").into_owned()
}

fn round_coordinate(value: f64) -> f64 {
    let rounded = (value * 1e6).round() / 1e6;
    // avoid "-0" in ids
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Stable sort placing results from [`PREFERRED_COUNTRY`] first
pub fn sort_preferred_country(locations: &mut [LocationInfo]) {
    locations.sort_by_key(|loc| loc.country != PREFERRED_COUNTRY);
}
