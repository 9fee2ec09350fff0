//! Route definitions for the weather dashboard proxy

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(handlers::get_weather))
        // Place search and reverse geocoding
        .route("/geocode", get(handlers::search_locations))
        .route("/geocode/reverse", get(handlers::reverse_geocode))
}
