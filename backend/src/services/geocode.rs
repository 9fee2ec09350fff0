//! Geocode service: place search with a Korean-to-English fallback, and
//! reverse lookup

use shared::{
    english_place_name, sort_preferred_country, GeocodeResult, Language, LocationInfo,
};

use crate::error::AppResult;
use crate::external::OpenWeatherClient;

/// Default number of search candidates
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Default number of reverse-geocoding candidates
pub const DEFAULT_REVERSE_LIMIT: u32 = 1;

#[derive(Clone)]
pub struct GeocodeService {
    client: OpenWeatherClient,
}

impl GeocodeService {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    /// Search by place name and shape the results for display
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        lang: Language,
    ) -> AppResult<Vec<LocationInfo>> {
        let results = self.search_raw(query, limit, lang).await?;
        Ok(to_locations(&results, lang))
    }

    /// Provider search with a single English retry for well-known Korean
    /// names that return nothing in Korean
    pub async fn search_raw(
        &self,
        query: &str,
        limit: u32,
        lang: Language,
    ) -> AppResult<Vec<GeocodeResult>> {
        let query = query.trim();
        tracing::debug!(query, limit, lang = %lang, "Geocoding search");

        let results = self.client.geocode_direct(query, limit, lang).await?;
        if !results.is_empty() || lang != Language::Korean {
            return Ok(results);
        }

        let Some(english) = english_place_name(query) else {
            tracing::debug!(query, "No results and no English name to retry with");
            return Ok(results);
        };

        tracing::info!(query, english, "No results, retrying in English");
        match self
            .client
            .geocode_direct(english, limit, Language::English)
            .await
        {
            Ok(retried) if !retried.is_empty() => Ok(retried),
            Ok(_) => Ok(results),
            Err(e) => {
                tracing::warn!(query, english, "English retry failed: {}", e);
                Ok(results)
            }
        }
    }

    /// Named places at the given coordinates
    pub async fn reverse(
        &self,
        lat: f64,
        lon: f64,
        limit: u32,
        lang: Language,
    ) -> AppResult<Vec<LocationInfo>> {
        let results = self.client.geocode_reverse(lat, lon, limit).await?;
        Ok(to_locations(&results, lang))
    }
}

/// Drop results without coordinates, build ids and display names, and list
/// preferred-country results first
pub fn to_locations(results: &[GeocodeResult], lang: Language) -> Vec<LocationInfo> {
    let mut locations: Vec<LocationInfo> = results
        .iter()
        .filter_map(|result| LocationInfo::from_geocode(result, lang))
        .collect();
    sort_preferred_country(&mut locations);
    locations
}
