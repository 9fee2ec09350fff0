//! HTTP client for the dashboard proxy
//!
//! Unwraps the `{success, data, error, message}` envelope every endpoint
//! returns. Failure envelopes surface as [`ClientError::Api`] carrying the
//! proxy's error code.

use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, Language, LocationInfo, UnitSystem, WeatherData};
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::retry::{with_retry, RetryPolicy};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Dashboard proxy client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client for the proxy at `base_url` with the default retry
    /// policy
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Combined current/hourly/daily forecast for a coordinate pair
    pub async fn weather(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> ClientResult<WeatherData> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", units.code().to_string()),
            ("lang", lang.code().to_string()),
        ];
        with_retry(self.retry, || self.get_envelope("/api/weather", &params)).await
    }

    /// Place-name search
    pub async fn search_locations(
        &self,
        query: &str,
        limit: u32,
        lang: Language,
    ) -> ClientResult<Vec<LocationInfo>> {
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("lang", lang.code().to_string()),
        ];
        with_retry(self.retry, || self.get_envelope("/api/geocode", &params)).await
    }

    /// Named places at a coordinate pair
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
        lang: Language,
    ) -> ClientResult<Vec<LocationInfo>> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("lang", lang.code().to_string()),
        ];
        with_retry(self.retry, || {
            self.get_envelope("/api/geocode/reverse", &params)
        })
        .await
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Proxy request");

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ClientError::Decode(e.to_string())),
            Err(_) => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    code: "HTTP_ERROR".to_string(),
                    message: status.to_string(),
                })
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: envelope.error.unwrap_or_else(|| "UNKNOWN_ERROR".to_string()),
                message: envelope
                    .message
                    .unwrap_or_else(|| "An error occurred while fetching the data".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| ClientError::Decode("Envelope has no data".to_string()))
    }
}
