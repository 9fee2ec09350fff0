//! Weather Dashboard - native client
//!
//! Talks to the proxy the way the browser does: retrying API calls, a
//! last-request-wins forecast feed with single-flight background refresh,
//! debounced place search and device-position resolution.

pub mod api;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod geolocation;
pub mod refresh;
pub mod retry;
pub mod search;

pub use api::ApiClient;
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult};
pub use feed::{FeedOutcome, FeedRequest, FeedUpdate, ForecastFeed, WeatherSource};
pub use geolocation::{
    resolve_current_location, select_current_location, FixedPosition, GeolocationError,
    Geolocator, Position, Unavailable,
};
pub use refresh::{RefreshHandle, RefreshScheduler, RefreshTrigger};
pub use retry::RetryPolicy;
pub use search::LocationSearch;
