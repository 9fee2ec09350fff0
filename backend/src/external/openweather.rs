//! OpenWeatherMap API client
//!
//! Current conditions, the 5-day / 3-hour forecast feed and direct/reverse
//! geocoding. Every call carries the `appid` credential; any non-2xx
//! response fails that call.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{
    Accumulation, CurrentConditions, CurrentReport, GeocodeResult, Language, RawSample,
    UnitSystem, WeatherCondition,
};
use std::time::Duration;

use crate::config::{WeatherConfig, DEFAULT_API_ENDPOINT, DEFAULT_GEO_ENDPOINT};
use crate::error::{AppError, AppResult};

/// Place name reported when the provider omits one
const UNKNOWN_PLACE: &str = "Unknown";

/// Visibility reported when the provider omits it, in meters
const DEFAULT_VISIBILITY: i32 = 10_000;

/// OpenWeatherMap API client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: OWMMain,
    visibility: Option<i32>,
    #[serde(default)]
    wind: OWMWind,
    #[serde(default)]
    clouds: OWMClouds,
    rain: Option<Accumulation>,
    snow: Option<Accumulation>,
    dt: i64,
    #[serde(default)]
    sys: OWMSys,
    timezone: Option<i32>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    pressure: i32,
    humidity: i32,
}

#[derive(Debug, Default, Deserialize)]
struct OWMWind {
    #[serde(default)]
    speed: f64,
    deg: Option<i32>,
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OWMClouds {
    #[serde(default)]
    all: i32,
}

#[derive(Debug, Default, Deserialize)]
struct OWMSys {
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

/// OpenWeatherMap API response for the 5-day forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default)]
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    #[serde(default)]
    clouds: OWMClouds,
    #[serde(default)]
    wind: OWMWind,
    visibility: Option<i32>,
    pop: Option<f64>,
    rain: Option<Accumulation>,
    snow: Option<Accumulation>,
}

impl OpenWeatherClient {
    /// Create a new OpenWeatherClient against the public endpoints
    pub fn new(api_key: String) -> Self {
        Self::with_base_urls(
            api_key,
            DEFAULT_API_ENDPOINT.to_string(),
            DEFAULT_GEO_ENDPOINT.to_string(),
        )
    }

    /// Create a new OpenWeatherClient with custom endpoints (for testing)
    pub fn with_base_urls(api_key: String, base_url: String, geo_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            geo_url: geo_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from configuration, applying the request timeout
    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            geo_url: config.geo_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions by coordinates
    pub async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> AppResult<CurrentReport> {
        let url = format!("{}/weather", self.base_url);
        let data: OWMCurrentResponse = self
            .get_json(
                &url,
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", units.code().to_string()),
                    ("lang", lang.code().to_string()),
                ],
                "Weather API",
            )
            .await?;

        Ok(self.convert_current_response(data))
    }

    /// Fetch the 5-day / 3-hour forecast feed by coordinates
    pub async fn five_day_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> AppResult<Vec<RawSample>> {
        let url = format!("{}/forecast", self.base_url);
        let data: OWMForecastResponse = self
            .get_json(
                &url,
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", units.code().to_string()),
                    ("lang", lang.code().to_string()),
                ],
                "5-day forecast API",
            )
            .await?;

        Ok(data.list.into_iter().map(convert_forecast_item).collect())
    }

    /// Direct geocoding: place name to candidate locations
    pub async fn geocode_direct(
        &self,
        query: &str,
        limit: u32,
        lang: Language,
    ) -> AppResult<Vec<GeocodeResult>> {
        let url = format!("{}/direct", self.geo_url);
        self.get_json(
            &url,
            &[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("lang", lang.code().to_string()),
            ],
            "Geocoding API",
        )
        .await
    }

    /// Reverse geocoding: coordinates to nearby named places
    pub async fn geocode_reverse(
        &self,
        lat: f64,
        lon: f64,
        limit: u32,
    ) -> AppResult<Vec<GeocodeResult>> {
        let url = format!("{}/reverse", self.geo_url);
        self.get_json(
            &url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("limit", limit.to_string()),
            ],
            "Reverse geocoding API",
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        api: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .query(&[("appid", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                status: None,
                message: format!("{} request failed: {}", api, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "{} returned an error", api);
            return Err(AppError::Upstream {
                status: Some(status.as_u16()),
                message: format!("{} error: {}", api, status.as_u16()),
            });
        }

        response.json().await.map_err(|e| AppError::Upstream {
            status: None,
            message: format!("Failed to parse {} response: {}", api, e),
        })
    }

    /// Convert OpenWeatherMap current response to the normalizer's input
    fn convert_current_response(&self, data: OWMCurrentResponse) -> CurrentReport {
        CurrentReport {
            place_name: data
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            timezone_offset: data.timezone.unwrap_or(0),
            conditions: CurrentConditions {
                dt: data.dt,
                sunrise: data.sys.sunrise,
                sunset: data.sys.sunset,
                temp: data.main.temp,
                feels_like: data.main.feels_like,
                pressure: data.main.pressure,
                humidity: data.main.humidity,
                dew_point: 0.0,
                uvi: 0.0,
                clouds: data.clouds.all,
                visibility: data.visibility.unwrap_or(DEFAULT_VISIBILITY),
                wind_speed: data.wind.speed,
                wind_deg: data.wind.deg.unwrap_or(0),
                wind_gust: data.wind.gust,
                weather: data.weather,
                rain: data.rain,
                snow: data.snow,
            },
            alerts: None,
        }
    }
}

fn convert_forecast_item(item: OWMForecastItem) -> RawSample {
    RawSample {
        dt: item.dt,
        temp: item.main.temp,
        feels_like: item.main.feels_like,
        pressure: item.main.pressure,
        humidity: item.main.humidity,
        clouds: item.clouds.all,
        visibility: item.visibility.unwrap_or(DEFAULT_VISIBILITY),
        wind_speed: item.wind.speed,
        wind_deg: item.wind.deg.unwrap_or(0),
        wind_gust: item.wind.gust,
        weather: item.weather,
        pop: item.pop.unwrap_or(0.0),
        rain: item.rain,
        snow: item.snow,
    }
}
