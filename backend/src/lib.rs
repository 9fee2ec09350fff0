//! Weather Dashboard - proxy server library
//!
//! Keeps the provider credential server-side and serves the browser a
//! normalized one-call-style forecast plus place search.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use external::OpenWeatherClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no API key is configured
    pub provider: Option<OpenWeatherClient>,
}

impl AppState {
    /// Build state from configuration. A missing API key is not fatal:
    /// provider-backed endpoints answer `API_KEY_MISSING` instead.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let provider = if config.weather.is_configured() {
            Some(OpenWeatherClient::from_config(&config.weather)?)
        } else {
            tracing::warn!("Weather API key is not configured; provider endpoints will fail");
            None
        };

        Ok(Self {
            config: Arc::new(config),
            provider,
        })
    }

    /// The provider client, or a configuration error
    pub fn provider(&self) -> AppResult<&OpenWeatherClient> {
        self.provider.as_ref().ok_or(AppError::Configuration)
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weather Dashboard API"
}
