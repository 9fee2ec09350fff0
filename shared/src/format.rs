//! Display formatting helpers

use crate::types::{UnitSystem, WindSpeedUnit};

/// Round half toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
///
/// Daily averages and displayed temperatures use this rather than
/// `f64::round`, which rounds half away from zero.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn format_temperature(temp: f64, units: UnitSystem) -> String {
    format!("{}{}", round_half_up(temp), units.temperature_symbol())
}

/// Convert a provider wind speed to the chosen display unit.
///
/// Metric input is m/s, imperial input is mph; the display unit is chosen
/// independently of the unit system.
pub fn convert_wind_speed(speed: f64, units: UnitSystem, display: WindSpeedUnit) -> f64 {
    match (units, display) {
        (UnitSystem::Metric, WindSpeedUnit::MetersPerSecond) => speed,
        (UnitSystem::Metric, WindSpeedUnit::KilometersPerHour) => speed * 3.6,
        (UnitSystem::Metric, WindSpeedUnit::MilesPerHour) => speed * 2.23694,
        (UnitSystem::Imperial, WindSpeedUnit::MetersPerSecond) => speed * 0.44704,
        (UnitSystem::Imperial, WindSpeedUnit::KilometersPerHour) => speed * 1.60934,
        (UnitSystem::Imperial, WindSpeedUnit::MilesPerHour) => speed,
    }
}

pub fn format_wind_speed(speed: f64, units: UnitSystem, display: WindSpeedUnit) -> String {
    format!(
        "{:.1} {}",
        convert_wind_speed(speed, units, display),
        display.symbol()
    )
}

pub fn format_humidity(humidity: i32) -> String {
    format!("{}%", humidity)
}

/// Probability of precipitation (0-1) as a whole percentage
pub fn format_precipitation_probability(pop: f64) -> String {
    format!("{}%", round_half_up(pop * 100.0))
}

pub fn format_pressure(pressure: i32) -> String {
    format!("{} hPa", pressure)
}

/// Weather icon size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    #[default]
    Small,
    Large,
}

/// Provider icon URL for a condition icon code
pub fn weather_icon_url(code: &str, size: IconSize) -> String {
    let suffix = match size {
        IconSize::Small => "",
        IconSize::Large => "@4x",
    };
    format!("https://openweathermap.org/img/wn/{}{}.png", code, suffix)
}

/// UV index band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UviLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UviLevel {
    /// Translation key for the band label
    pub fn key(&self) -> &'static str {
        match self {
            UviLevel::Low => "uvi.low",
            UviLevel::Moderate => "uvi.moderate",
            UviLevel::High => "uvi.high",
            UviLevel::VeryHigh => "uvi.veryHigh",
            UviLevel::Extreme => "uvi.extreme",
        }
    }
}

pub fn uvi_level(uvi: f64) -> UviLevel {
    if uvi <= 2.0 {
        UviLevel::Low
    } else if uvi <= 5.0 {
        UviLevel::Moderate
    } else if uvi <= 7.0 {
        UviLevel::High
    } else if uvi <= 10.0 {
        UviLevel::VeryHigh
    } else {
        UviLevel::Extreme
    }
}
