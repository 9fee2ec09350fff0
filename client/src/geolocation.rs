//! Device position resolution
//!
//! A position is reverse geocoded into a named place. If the lookup fails
//! or finds nothing, a "current location" placeholder stands in. If the
//! position itself can't be obtained, nothing is selected.

use shared::{Language, LocationInfo, PreferenceStore, StoragePort};
use std::future::Future;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Position lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation is not supported")]
    Unsupported,
}

/// Device position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters
    pub accuracy: f64,
}

/// Source of the device position
pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Position, GeolocationError>> + Send;
}

/// A position configured up front, for hosts without a positioning service
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

impl Geolocator for FixedPosition {
    fn current_position(&self) -> impl Future<Output = Result<Position, GeolocationError>> + Send {
        std::future::ready(Ok(self.0))
    }
}

/// No positioning service
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Geolocator for Unavailable {
    fn current_position(&self) -> impl Future<Output = Result<Position, GeolocationError>> + Send {
        std::future::ready(Err(GeolocationError::Unsupported))
    }
}

/// Resolve the device position into a location
pub async fn resolve_current_location<G: Geolocator>(
    geolocator: &G,
    api: &ApiClient,
    language: Language,
) -> ClientResult<LocationInfo> {
    let position = match geolocator.current_position().await {
        Ok(position) => position,
        Err(e) => {
            tracing::warn!("Could not get device position: {}", e);
            return Err(e.into());
        }
    };
    let (lat, lon) = (position.latitude, position.longitude);

    match api.reverse_geocode(lat, lon, language).await {
        Ok(mut found) if !found.is_empty() => Ok(found.swap_remove(0)),
        Ok(_) => {
            tracing::info!(lat, lon, "No place found at device position");
            Ok(LocationInfo::current_position(lat, lon, language))
        }
        Err(e) => {
            tracing::warn!(lat, lon, "Reverse geocoding failed: {}", e);
            Ok(LocationInfo::current_position(lat, lon, language))
        }
    }
}

/// Resolve the device position and make it the selected location. On a
/// position failure the store is left untouched.
pub async fn select_current_location<G, P>(
    store: &mut PreferenceStore<P>,
    geolocator: &G,
    api: &ApiClient,
) -> ClientResult<LocationInfo>
where
    G: Geolocator,
    P: StoragePort,
{
    let language = store.preferences().language;
    let location = resolve_current_location(geolocator, api, language).await?;

    if let Err(e) = store.select_location(location.clone()) {
        tracing::warn!("Failed to persist selected location: {}", e);
    }
    Ok(location)
}
