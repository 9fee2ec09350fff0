//! Forecast normalization
//!
//! Reshapes the provider's 5-day / 3-hour interval feed plus a
//! current-conditions snapshot into the one-call-style
//! `{current, hourly, daily}` payload.
//!
//! "Local" means the location's UTC offset as reported with the current
//! conditions; day keys and part-of-day buckets are computed under it.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};
use thiserror::Error;

use crate::format::round_half_up;
use crate::models::{
    CurrentConditions, CurrentReport, DailyFeelsLike, DailyForecast, DailyTemperature,
    HourlyForecast, RawSample, WeatherCondition, WeatherData,
};

/// Maximum number of projected interval entries
pub const HOURLY_LIMIT: usize = 24;

/// Maximum number of aggregated days
pub const DAILY_LIMIT: usize = 7;

/// The interval data could not be aggregated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartialDataError {
    #[error("invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),

    #[error("invalid sample timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Part-of-day bucket by local hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfDay {
    /// 06:00-12:00
    Morning,
    /// 12:00-18:00
    Day,
    /// 18:00-22:00
    Evening,
    /// Everything else
    Night,
}

impl PartOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => PartOfDay::Morning,
            12..=17 => PartOfDay::Day,
            18..=21 => PartOfDay::Evening,
            _ => PartOfDay::Night,
        }
    }
}

/// Local midnight (epoch seconds) and local hour for `dt`
pub fn local_day(dt: i64, offset: FixedOffset) -> Result<(i64, u32), PartialDataError> {
    let local = DateTime::from_timestamp(dt, 0)
        .ok_or(PartialDataError::InvalidTimestamp(dt))?
        .with_timezone(&offset);
    let midnight = local
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .ok_or(PartialDataError::InvalidTimestamp(dt))?;
    Ok((midnight.timestamp(), local.hour()))
}

/// Build the full payload from current conditions and interval samples
pub fn normalize_forecast(
    lat: f64,
    lon: f64,
    report: CurrentReport,
    samples: &[RawSample],
) -> Result<WeatherData, PartialDataError> {
    let offset = FixedOffset::east_opt(report.timezone_offset)
        .ok_or(PartialDataError::InvalidOffset(report.timezone_offset))?;

    let hourly = project_hourly(samples);
    let daily = aggregate_daily(samples, offset, &report.conditions)?;

    tracing::debug!(
        samples = samples.len(),
        hourly = hourly.len(),
        daily = daily.len(),
        "Normalized forecast feed"
    );

    Ok(WeatherData {
        lat,
        lon,
        timezone: report.place_name,
        timezone_offset: report.timezone_offset,
        current: report.conditions,
        hourly,
        daily,
        alerts: report.alerts,
    })
}

/// Normalize when interval samples are available, otherwise degrade to
/// current conditions only. Aggregation failures degrade the same way.
pub fn normalize_or_degrade(
    lat: f64,
    lon: f64,
    report: CurrentReport,
    samples: Option<&[RawSample]>,
) -> WeatherData {
    let Some(samples) = samples else {
        return WeatherData::current_only(lat, lon, report);
    };

    match normalize_forecast(lat, lon, report.clone(), samples) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Forecast aggregation failed, serving current conditions only: {}", e);
            WeatherData::current_only(lat, lon, report)
        }
    }
}

/// First [`HOURLY_LIMIT`] samples in chronological order, one entry each.
/// No interpolation: entries keep the feed's 3-hour spacing.
pub fn project_hourly(samples: &[RawSample]) -> Vec<HourlyForecast> {
    let mut ordered: Vec<&RawSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.dt);
    ordered
        .into_iter()
        .take(HOURLY_LIMIT)
        .map(HourlyForecast::from)
        .collect()
}

/// Group samples by local day in encounter order and finalize at most
/// [`DAILY_LIMIT`] days
pub fn aggregate_daily(
    samples: &[RawSample],
    offset: FixedOffset,
    current: &CurrentConditions,
) -> Result<Vec<DailyForecast>, PartialDataError> {
    let mut days: Vec<DayAccumulator> = Vec::new();

    for sample in samples {
        let (key, hour) = local_day(sample.dt, offset)?;
        let index = match days.iter().position(|d| d.dt == key) {
            Some(index) => index,
            None => {
                days.push(DayAccumulator::new(key));
                days.len() - 1
            }
        };
        days[index].add(sample, PartOfDay::from_hour(hour));
    }

    Ok(days
        .into_iter()
        .take(DAILY_LIMIT)
        .map(|day| day.finish(current))
        .collect())
}

/// Running maxima per part of day; `None` until a sample lands in the bucket
#[derive(Debug, Default, Clone, Copy)]
struct Buckets {
    morn: Option<f64>,
    day: Option<f64>,
    eve: Option<f64>,
    night: Option<f64>,
}

impl Buckets {
    /// Only a strictly greater value replaces the stored maximum
    fn raise(&mut self, part: PartOfDay, value: f64) {
        let slot = match part {
            PartOfDay::Morning => &mut self.morn,
            PartOfDay::Day => &mut self.day,
            PartOfDay::Evening => &mut self.eve,
            PartOfDay::Night => &mut self.night,
        };
        if slot.map_or(true, |current| value > current) {
            *slot = Some(value);
        }
    }

    /// Empty day/evening buckets take the max, night/morning the min
    fn backfill(&self, min: f64, max: f64) -> (f64, f64, f64, f64) {
        (
            self.day.unwrap_or(max),
            self.night.unwrap_or(min),
            self.eve.unwrap_or(max),
            self.morn.unwrap_or(min),
        )
    }
}

#[derive(Debug)]
struct DayAccumulator {
    dt: i64,
    min: f64,
    max: f64,
    feels_min: f64,
    feels_max: f64,
    temp: Buckets,
    feels_like: Buckets,
    weather: Vec<WeatherCondition>,
    pop: f64,
    pressure: i64,
    humidity: i64,
    clouds: i64,
    wind_deg: i64,
    wind_speed: f64,
    rain: f64,
    snow: f64,
    samples: u32,
}

impl DayAccumulator {
    fn new(dt: i64) -> Self {
        Self {
            dt,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            feels_min: f64::INFINITY,
            feels_max: f64::NEG_INFINITY,
            temp: Buckets::default(),
            feels_like: Buckets::default(),
            weather: Vec::new(),
            pop: 0.0,
            pressure: 0,
            humidity: 0,
            clouds: 0,
            wind_deg: 0,
            wind_speed: 0.0,
            rain: 0.0,
            snow: 0.0,
            samples: 0,
        }
    }

    fn add(&mut self, sample: &RawSample, part: PartOfDay) {
        self.min = self.min.min(sample.temp);
        self.max = self.max.max(sample.temp);
        self.feels_min = self.feels_min.min(sample.feels_like);
        self.feels_max = self.feels_max.max(sample.feels_like);

        self.temp.raise(part, sample.temp);
        self.feels_like.raise(part, sample.feels_like);

        // First sample wins until a strictly wetter one shows up
        if self.weather.is_empty() || sample.pop > self.pop {
            self.weather = sample.weather.clone();
            self.pop = sample.pop;
        }

        self.pressure += i64::from(sample.pressure);
        self.humidity += i64::from(sample.humidity);
        self.clouds += i64::from(sample.clouds);
        self.wind_deg += i64::from(sample.wind_deg);
        self.wind_speed += sample.wind_speed;

        self.rain += sample.rain.and_then(|r| r.three_hour).unwrap_or(0.0);
        self.snow += sample.snow.and_then(|s| s.three_hour).unwrap_or(0.0);

        self.samples += 1;
    }

    fn finish(self, current: &CurrentConditions) -> DailyForecast {
        let n = f64::from(self.samples.max(1));
        let average = |sum: i64| round_half_up(sum as f64 / n) as i32;

        let (day, night, eve, morn) = self.temp.backfill(self.min, self.max);
        let (feels_day, feels_night, feels_eve, feels_morn) =
            self.feels_like.backfill(self.feels_min, self.feels_max);

        DailyForecast {
            dt: self.dt,
            // The interval feed has no per-day sun times
            sunrise: current.sunrise,
            sunset: current.sunset,
            moonrise: 0,
            moonset: 0,
            moon_phase: 0.0,
            temp: DailyTemperature {
                day,
                min: self.min,
                max: self.max,
                night,
                eve,
                morn,
            },
            feels_like: DailyFeelsLike {
                day: feels_day,
                night: feels_night,
                eve: feels_eve,
                morn: feels_morn,
            },
            pressure: average(self.pressure),
            humidity: average(self.humidity),
            dew_point: 0.0,
            wind_speed: self.wind_speed / n,
            wind_deg: average(self.wind_deg),
            wind_gust: None,
            weather: self.weather,
            clouds: average(self.clouds),
            pop: self.pop,
            rain: self.rain,
            snow: self.snow,
            uvi: 0.0,
        }
    }
}
