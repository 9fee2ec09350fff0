//! Forecast feed for the selected location
//!
//! Every `load` bumps a generation counter; a result is applied only if no
//! newer request started while it was in flight, so the last request wins.
//! Background refreshes reuse the current generation and are single-flight.

use parking_lot::RwLock;
use shared::{Language, LocationInfo, UnitSystem, WeatherData};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::ApiClient;
use crate::error::ClientResult;

const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Where forecasts come from
pub trait WeatherSource: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &FeedRequest,
    ) -> impl Future<Output = ClientResult<WeatherData>> + Send;
}

impl WeatherSource for ApiClient {
    fn fetch(
        &self,
        request: &FeedRequest,
    ) -> impl Future<Output = ClientResult<WeatherData>> + Send {
        self.weather(
            request.location.lat,
            request.location.lon,
            request.units,
            request.language,
        )
    }
}

/// What the feed is showing: a place plus the display settings that change
/// the provider response
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRequest {
    pub location: LocationInfo,
    pub units: UnitSystem,
    pub language: Language,
}

/// An applied forecast
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub generation: u64,
    pub request: FeedRequest,
    pub data: Arc<WeatherData>,
}

#[derive(Debug, Clone)]
pub enum FeedOutcome {
    Applied(FeedUpdate),
    /// A newer request started while this one was in flight
    Stale,
    /// Another refresh was already in flight
    Skipped,
    /// Nothing to refresh yet
    Idle,
}

/// Generation and request change together
#[derive(Debug, Default)]
struct Current {
    generation: u64,
    request: Option<FeedRequest>,
}

pub struct ForecastFeed<S> {
    source: S,
    refreshing: AtomicBool,
    current: RwLock<Current>,
    latest: RwLock<Option<FeedUpdate>>,
    updates: broadcast::Sender<FeedUpdate>,
}

/// Clears the single-flight flag when a refresh finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: WeatherSource> ForecastFeed<S> {
    pub fn new(source: S) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            source,
            refreshing: AtomicBool::new(false),
            current: RwLock::new(Current::default()),
            latest: RwLock::new(None),
            updates,
        }
    }

    /// Switch the feed to `request` and fetch it
    pub async fn load(&self, request: FeedRequest) -> ClientResult<FeedOutcome> {
        let generation = {
            let mut current = self.current.write();
            current.generation += 1;
            current.request = Some(request.clone());
            current.generation
        };
        tracing::debug!(generation, location = %request.location.id, "Loading forecast");

        let result = self.source.fetch(&request).await;
        self.settle(generation, request, result)
    }

    /// Re-fetch the current request. Skipped while another refresh runs.
    pub async fn refresh(&self) -> ClientResult<FeedOutcome> {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            tracing::debug!("Refresh already in flight, skipping");
            return Ok(FeedOutcome::Skipped);
        }
        let _in_flight = InFlight(&self.refreshing);

        let (generation, request) = {
            let current = self.current.read();
            (current.generation, current.request.clone())
        };
        let Some(request) = request else {
            return Ok(FeedOutcome::Idle);
        };

        let result = self.source.fetch(&request).await;
        self.settle(generation, request, result)
    }

    fn settle(
        &self,
        generation: u64,
        request: FeedRequest,
        result: ClientResult<WeatherData>,
    ) -> ClientResult<FeedOutcome> {
        // Check and publish under one lock so an older result can't land
        // after a newer one.
        let mut latest = self.latest.write();
        if self.current.read().generation != generation {
            tracing::debug!(generation, "Discarding stale forecast");
            return Ok(FeedOutcome::Stale);
        }

        let update = FeedUpdate {
            generation,
            request,
            data: Arc::new(result?),
        };
        *latest = Some(update.clone());
        // No subscribers is fine
        let _ = self.updates.send(update.clone());

        Ok(FeedOutcome::Applied(update))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.updates.subscribe()
    }

    /// Most recently applied forecast
    pub fn latest(&self) -> Option<FeedUpdate> {
        self.latest.read().clone()
    }

    pub fn request(&self) -> Option<FeedRequest> {
        self.current.read().request.clone()
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }
}
