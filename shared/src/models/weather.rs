//! Weather data models
//!
//! Field names follow the provider's one-call JSON shape so the browser
//! consumes the normalized payload unchanged.

use serde::{Deserialize, Serialize};

/// Provider weather condition entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherCondition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Rain or snow accumulation in millimeters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Accumulation {
    #[serde(rename = "1h", default, skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default, skip_serializing_if = "Option::is_none")]
    pub three_hour: Option<f64>,
}

/// One 3-hour forecast point from the interval feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawSample {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i32,
    pub humidity: i32,
    pub clouds: i32,
    pub visibility: i32,
    pub wind_speed: f64,
    pub wind_deg: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub weather: Vec<WeatherCondition>,
    /// Probability of precipitation (0-1)
    pub pop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Accumulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Accumulation>,
}

/// Conditions at request time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i32,
    pub humidity: i32,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: i32,
    pub visibility: i32,
    pub wind_speed: f64,
    pub wind_deg: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub weather: Vec<WeatherCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Accumulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Accumulation>,
}

/// Current-conditions fetch result as handed to the normalizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentReport {
    /// Place name reported by the provider
    pub place_name: String,
    /// Shift in seconds from UTC for the requested location
    pub timezone_offset: i32,
    pub conditions: CurrentConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<WeatherAlert>>,
}

/// One projected forecast entry. Entries are 3 hours apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyForecast {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i32,
    pub humidity: i32,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: i32,
    pub visibility: i32,
    pub wind_speed: f64,
    pub wind_deg: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub weather: Vec<WeatherCondition>,
    pub pop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Accumulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Accumulation>,
}

impl From<&RawSample> for HourlyForecast {
    fn from(sample: &RawSample) -> Self {
        Self {
            dt: sample.dt,
            temp: sample.temp,
            feels_like: sample.feels_like,
            pressure: sample.pressure,
            humidity: sample.humidity,
            dew_point: 0.0,
            uvi: 0.0,
            clouds: sample.clouds,
            visibility: sample.visibility,
            wind_speed: sample.wind_speed,
            wind_deg: sample.wind_deg,
            wind_gust: sample.wind_gust,
            weather: sample.weather.clone(),
            pop: sample.pop,
            rain: sample.rain,
            snow: sample.snow,
        }
    }
}

/// Daily temperature buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

/// Daily feels-like buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

/// One local calendar day aggregated from interval samples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    /// Local midnight of the day, epoch seconds
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub moonrise: i64,
    pub moonset: i64,
    pub moon_phase: f64,
    pub temp: DailyTemperature,
    pub feels_like: DailyFeelsLike,
    pub pressure: i32,
    pub humidity: i32,
    pub dew_point: f64,
    pub wind_speed: f64,
    pub wind_deg: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub weather: Vec<WeatherCondition>,
    pub clouds: i32,
    pub pop: f64,
    pub rain: f64,
    pub snow: f64,
    pub uvi: f64,
}

/// Provider weather alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAlert {
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Combined one-call-style payload served by the proxy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherData {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub timezone_offset: i32,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<WeatherAlert>>,
}

impl WeatherData {
    /// Minimal payload used when the interval feed is unavailable
    pub fn current_only(lat: f64, lon: f64, report: CurrentReport) -> Self {
        Self {
            lat,
            lon,
            timezone: report.place_name,
            timezone_offset: report.timezone_offset,
            current: report.conditions,
            hourly: Vec::new(),
            daily: Vec::new(),
            alerts: report.alerts,
        }
    }

    /// True when only current conditions are present
    pub fn is_degraded(&self) -> bool {
        self.hourly.is_empty() && self.daily.is_empty()
    }
}
