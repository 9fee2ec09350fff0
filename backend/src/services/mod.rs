//! Business logic services for the weather dashboard proxy

pub mod forecast;
pub mod geocode;

pub use forecast::ForecastService;
pub use geocode::GeocodeService;
