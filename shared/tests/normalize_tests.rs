//! Forecast normalization tests
//!
//! Property-based checks over arbitrary interval feeds:
//! - at most 24 hourly entries, chronological
//! - at most 7 days, keyed by local midnight
//! - min <= every bucket <= max
//! - representative weather carries the day's highest precipitation chance

use chrono::{DateTime, FixedOffset, Timelike};
use proptest::prelude::*;
use shared::{
    normalize_forecast, normalize_or_degrade, CurrentConditions, CurrentReport, RawSample,
    WeatherCondition, DAILY_LIMIT, HOURLY_LIMIT,
};

/// 2023-09-10T00:00:00Z
const FEED_START: i64 = 1_694_304_000;
const THREE_HOURS: i64 = 3 * 3_600;

fn conditions() -> CurrentConditions {
    CurrentConditions {
        dt: FEED_START,
        sunrise: FEED_START + 21_600,
        sunset: FEED_START + 68_400,
        temp: 21.0,
        feels_like: 20.5,
        pressure: 1011,
        humidity: 58,
        dew_point: 0.0,
        uvi: 0.0,
        clouds: 10,
        visibility: 10_000,
        wind_speed: 1.5,
        wind_deg: 270,
        wind_gust: None,
        weather: vec![WeatherCondition {
            id: 800,
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        }],
        rain: None,
        snow: None,
    }
}

fn report(offset: i32) -> CurrentReport {
    CurrentReport {
        place_name: "Test".to_string(),
        timezone_offset: offset,
        conditions: conditions(),
        alerts: None,
    }
}

fn sample(dt: i64, temp: f64, feels_like: f64, pop: f64, weather_id: i64) -> RawSample {
    RawSample {
        dt,
        temp,
        feels_like,
        pressure: 1000 + (weather_id % 30) as i32,
        humidity: 50,
        clouds: 30,
        visibility: 10_000,
        wind_speed: 2.0,
        wind_deg: 90,
        wind_gust: None,
        weather: vec![WeatherCondition {
            id: weather_id,
            main: "Rain".to_string(),
            description: "rain".to_string(),
            icon: "10d".to_string(),
        }],
        pop,
        rain: None,
        snow: None,
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// UTC offsets in quarter hours, -12h to +14h
fn offset_strategy() -> impl Strategy<Value = i32> {
    (-48i32..=56i32).prop_map(|q| q * 900)
}

/// A 3-hourly feed of up to 5 days with arbitrary readings
fn feed_strategy() -> impl Strategy<Value = Vec<RawSample>> {
    prop::collection::vec((-400i32..=450i32, -50i32..=50i32, 0u32..=100u32), 0..=40).prop_map(
        |readings| {
            readings
                .into_iter()
                .enumerate()
                .map(|(i, (temp, feels_delta, pop))| {
                    let temp = f64::from(temp) / 10.0;
                    sample(
                        FEED_START + i as i64 * THREE_HOURS,
                        temp,
                        temp + f64::from(feels_delta) / 10.0,
                        f64::from(pop) / 100.0,
                        500 + i as i64,
                    )
                })
                .collect()
        },
    )
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Hourly projection is bounded and chronological
        #[test]
        fn prop_hourly_bounded_and_ordered(
            feed in feed_strategy(),
            offset in offset_strategy()
        ) {
            let mut shuffled = feed.clone();
            shuffled.reverse();
            let data = normalize_forecast(37.5, 127.0, report(offset), &shuffled).unwrap();

            prop_assert_eq!(data.hourly.len(), feed.len().min(HOURLY_LIMIT));
            prop_assert!(data.hourly.windows(2).all(|w| w[0].dt <= w[1].dt));
            if let Some(first) = data.hourly.first() {
                prop_assert_eq!(first.dt, FEED_START);
            }
        }

        /// Daily aggregation is bounded and keyed by local midnight
        #[test]
        fn prop_daily_keys_are_local_midnight(
            feed in feed_strategy(),
            offset in offset_strategy()
        ) {
            let data = normalize_forecast(37.5, 127.0, report(offset), &feed).unwrap();
            let tz = FixedOffset::east_opt(offset).unwrap();

            prop_assert!(data.daily.len() <= DAILY_LIMIT);
            for day in &data.daily {
                let local = DateTime::from_timestamp(day.dt, 0).unwrap().with_timezone(&tz);
                prop_assert_eq!((local.hour(), local.minute(), local.second()), (0, 0, 0));
            }
            prop_assert!(data.daily.windows(2).all(|w| w[0].dt < w[1].dt));
        }

        /// Every temperature bucket lies within the day's min and max
        #[test]
        fn prop_buckets_within_min_max(
            feed in feed_strategy(),
            offset in offset_strategy()
        ) {
            let data = normalize_forecast(37.5, 127.0, report(offset), &feed).unwrap();

            for day in &data.daily {
                let t = day.temp;
                prop_assert!(t.min <= t.max);
                for bucket in [t.day, t.night, t.eve, t.morn] {
                    prop_assert!(t.min <= bucket && bucket <= t.max);
                }
            }
        }

        /// Representative weather comes from the first sample with the
        /// day's highest precipitation chance
        #[test]
        fn prop_representative_weather(
            feed in feed_strategy()
        ) {
            let data = normalize_forecast(37.5, 127.0, report(0), &feed).unwrap();

            for day in &data.daily {
                let members: Vec<&RawSample> = feed
                    .iter()
                    .filter(|s| s.dt >= day.dt && s.dt < day.dt + 86_400)
                    .collect();
                let best = members.iter().map(|s| s.pop).fold(0.0_f64, f64::max);
                let expected = members
                    .iter()
                    .find(|s| s.pop == best)
                    .map(|s| s.weather[0].id);

                prop_assert_eq!(day.pop, best);
                prop_assert_eq!(Some(day.weather[0].id), expected);
            }
        }

        /// Sun times always come from current conditions
        #[test]
        fn prop_sun_times_copied(feed in feed_strategy()) {
            let data = normalize_forecast(0.0, 0.0, report(0), &feed).unwrap();
            for day in &data.daily {
                prop_assert_eq!(day.sunrise, data.current.sunrise);
                prop_assert_eq!(day.sunset, data.current.sunset);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_five_day_feed_in_seoul() {
        let feed: Vec<RawSample> = (0..40)
            .map(|i| sample(FEED_START + i * THREE_HOURS, 15.0, 14.0, 0.0, 800))
            .collect();

        let data = normalize_forecast(37.5665, 126.978, report(32_400), &feed).unwrap();

        assert_eq!(data.hourly.len(), 24);
        // 09:00 local on day one through 06:00 local on day six
        assert_eq!(data.daily.len(), 6);
        assert_eq!(data.timezone_offset, 32_400);
        assert_eq!(data.timezone, "Test");
    }

    #[test]
    fn test_degraded_payload_serializes_empty_lists() {
        let data = normalize_or_degrade(37.5665, 126.978, report(32_400), None);
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["hourly"], serde_json::json!([]));
        assert_eq!(json["daily"], serde_json::json!([]));
        assert_eq!(json["current"]["sunrise"], FEED_START + 21_600);
        assert!(json.get("alerts").is_none());
    }
}
