//! Forecast service: current conditions plus the normalized interval feed

use shared::{normalize_or_degrade, Coordinates, Language, UnitSystem, WeatherData};

use crate::error::AppResult;
use crate::external::OpenWeatherClient;

/// Forecast service combining the two provider feeds
#[derive(Clone)]
pub struct ForecastService {
    client: OpenWeatherClient,
}

impl ForecastService {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    /// Fetch both feeds concurrently and build the one-call-style payload.
    ///
    /// A failed current-conditions fetch fails the request. A failed
    /// interval fetch degrades to current conditions only.
    pub async fn forecast(
        &self,
        coords: Coordinates,
        units: UnitSystem,
        lang: Language,
    ) -> AppResult<WeatherData> {
        let (current, samples) = tokio::join!(
            self.client.current_weather(coords.lat, coords.lon, units, lang),
            self.client.five_day_forecast(coords.lat, coords.lon, units, lang),
        );

        let report = current?;
        let samples = match samples {
            Ok(samples) => Some(samples),
            Err(e) => {
                tracing::warn!(
                    lat = coords.lat,
                    lon = coords.lon,
                    "Forecast feed unavailable, serving current conditions only: {}",
                    e
                );
                None
            }
        };

        let data = normalize_or_degrade(coords.lat, coords.lon, report, samples.as_deref());
        tracing::debug!(
            place = %data.timezone,
            hourly = data.hourly.len(),
            daily = data.daily.len(),
            "Forecast assembled"
        );
        Ok(data)
    }
}
