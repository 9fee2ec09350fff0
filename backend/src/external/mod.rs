//! External API integrations

pub mod openweather;

pub use openweather::OpenWeatherClient;
