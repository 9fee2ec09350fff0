//! Configuration management for the weather dashboard proxy
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WA__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Response caching hints
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather data endpoint (`/weather`, `/forecast`)
    pub api_endpoint: String,

    /// Geocoding endpoint (`/direct`, `/reverse`)
    pub geo_endpoint: String,

    /// Provider API key; empty means not configured
    #[serde(default)]
    pub api_key: String,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Shared-cache lifetime for successful responses
    pub max_age_secs: u32,

    /// Window in which a stale response may be served while revalidating
    pub stale_while_revalidate_secs: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WA_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        // The conventional provider variable is honoured as the lowest layer
        let api_key = std::env::var("OPENWEATHER_API_KEY").unwrap_or_default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", DEFAULT_API_ENDPOINT)?
            .set_default("weather.geo_endpoint", DEFAULT_GEO_ENDPOINT)?
            .set_default("weather.api_key", api_key)?
            .set_default("weather.request_timeout_secs", 10)?
            .set_default("cache.max_age_secs", 300)?
            .set_default("cache.stale_while_revalidate_secs", 60)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WA__ prefix)
            .add_source(
                Environment::with_prefix("WA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

pub const DEFAULT_API_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_ENDPOINT: &str = "https://api.openweathermap.org/geo/1.0";

impl WeatherConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl CacheConfig {
    /// `Cache-Control` value for successful proxy responses
    pub fn header_value(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.max_age_secs, self.stale_while_revalidate_secs
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            api_key: String::new(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 300,
            stale_while_revalidate_secs: 60,
        }
    }
}
