//! Proxy endpoint tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot` against a
//! wiremock stand-in for the weather provider.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wa_server::{config::WeatherConfig, create_app, AppState, Config};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 2023-09-10T00:00:00Z
const FEED_START: i64 = 1_694_304_000;

fn config_for(server: &MockServer, api_key: &str) -> Config {
    Config {
        environment: "test".to_string(),
        weather: WeatherConfig {
            api_endpoint: format!("{}/data/2.5", server.uri()),
            geo_endpoint: format!("{}/geo/1.0", server.uri()),
            api_key: api_key.to_string(),
            request_timeout_secs: 5,
        },
        ..Default::default()
    }
}

fn app_for(server: &MockServer) -> Router {
    let state = AppState::from_config(config_for(server, "test-key")).unwrap();
    create_app(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, cache_control, serde_json::from_slice(&bytes).unwrap())
}

fn current_fixture() -> Value {
    json!({
        "coord": {"lat": 37.5665, "lon": 126.978},
        "weather": [{"id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d"}],
        "main": {"temp": 24.1, "feels_like": 24.3, "temp_min": 22.0, "temp_max": 25.0, "pressure": 1012, "humidity": 68},
        "visibility": 10000,
        "wind": {"speed": 2.6, "deg": 250},
        "clouds": {"all": 20},
        "dt": FEED_START,
        "sys": {"sunrise": FEED_START - 10_800, "sunset": FEED_START + 34_200},
        "timezone": 32400,
        "name": "Seoul"
    })
}

fn forecast_fixture(count: i64) -> Value {
    let list: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "dt": FEED_START + i * 10_800,
                "main": {"temp": 20.0 + i as f64, "feels_like": 19.0 + i as f64, "temp_min": 18.0, "temp_max": 30.0, "pressure": 1010, "humidity": 60},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "clouds": {"all": 40},
                "wind": {"speed": 3.0, "deg": 180, "gust": 5.0},
                "visibility": 10000,
                "pop": 0.2,
                "rain": {"3h": 0.5}
            })
        })
        .collect();
    json!({"cod": "200", "cnt": count, "list": list})
}

async fn mount_current(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_fixture()))
        .mount(server)
        .await;
}

fn geocode_entry(name: &str, ko: &str, country: &str, lat: f64, lon: f64) -> Value {
    json!({
        "name": name,
        "local_names": {"ko": ko, "en": name},
        "lat": lat,
        "lon": lon,
        "country": country
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_provider_configuration() {
    let server = MockServer::start().await;

    let (status, _, body) = get(app_for(&server), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider_configured"], true);

    let unconfigured = create_app(AppState::from_config(config_for(&server, "")).unwrap());
    let (_, _, body) = get(unconfigured, "/health").await;
    assert_eq!(body["provider_configured"], false);
}

// ============================================================================
// /api/weather
// ============================================================================

#[tokio::test]
async fn test_weather_missing_api_key() {
    let server = MockServer::start().await;
    let app = create_app(AppState::from_config(config_for(&server, "")).unwrap());

    let (status, cache, body) = get(app, "/api/weather?lat=37.5&lon=127").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "API_KEY_MISSING");
    assert!(cache.is_none());
}

#[tokio::test]
async fn test_weather_missing_coordinates() {
    let server = MockServer::start().await;

    let (status, _, body) = get(app_for(&server), "/api/weather?lat=37.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PARAMS");
}

#[tokio::test]
async fn test_weather_invalid_coordinates() {
    let server = MockServer::start().await;

    for uri in [
        "/api/weather?lat=91&lon=0",
        "/api/weather?lat=0&lon=-181",
        "/api/weather?lat=abc&lon=0",
    ] {
        let (status, _, body) = get(app_for(&server), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "INVALID_COORDS", "{}", uri);
    }
}

#[tokio::test]
async fn test_weather_rejects_unknown_units() {
    let server = MockServer::start().await;

    let (status, _, body) = get(app_for(&server), "/api/weather?lat=1&lon=1&units=kelvin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PARAMS");
}

#[tokio::test]
async fn test_weather_success_normalizes_feed() {
    let server = MockServer::start().await;
    mount_current(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "ko"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture(40)))
        .mount(&server)
        .await;

    let (status, cache, body) = get(app_for(&server), "/api/weather?lat=37.5665&lon=126.978").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        cache.as_deref(),
        Some("public, s-maxage=300, stale-while-revalidate=60")
    );
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["timezone"], "Seoul");
    assert_eq!(data["timezone_offset"], 32400);
    assert_eq!(data["current"]["temp"], 24.1);
    assert_eq!(data["hourly"].as_array().unwrap().len(), 24);
    assert_eq!(data["hourly"][0]["uvi"], 0.0);

    let daily = data["daily"].as_array().unwrap();
    assert!(!daily.is_empty() && daily.len() <= 7);
    // First local day in Seoul starts at 2023-09-09T15:00:00Z
    assert_eq!(daily[0]["dt"], FEED_START - 32_400);
    assert_eq!(daily[0]["sunrise"], FEED_START - 10_800);
}

#[tokio::test]
async fn test_weather_degrades_when_forecast_fails() {
    let server = MockServer::start().await;
    mount_current(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (status, _, body) = get(app_for(&server), "/api/weather?lat=37.5665&lon=126.978").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hourly"], json!([]));
    assert_eq!(body["data"]["daily"], json!([]));
    assert_eq!(body["data"]["current"]["humidity"], 68);
}

#[tokio::test]
async fn test_weather_current_failure_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture(8)))
        .mount(&server)
        .await;

    let (status, _, body) = get(app_for(&server), "/api/weather?lat=1&lon=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API_ERROR");
    assert!(body["message"].as_str().unwrap().contains("401"));
}

// ============================================================================
// /api/geocode
// ============================================================================

#[tokio::test]
async fn test_geocode_missing_query() {
    let server = MockServer::start().await;

    let (status, _, body) = get(app_for(&server), "/api/geocode").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PARAMS");
}

#[tokio::test]
async fn test_geocode_rejects_injection_patterns() {
    let server = MockServer::start().await;

    for q in ["DROP%20TABLE", "Seoul%3B", "x%20OR%201%3D1", "a--b"] {
        let uri = format!("/api/geocode?q={}", q);
        let (status, _, body) = get(app_for(&server), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", q);
        assert_eq!(body["error"], "INVALID_QUERY_FORMAT", "{}", q);
    }
}

#[tokio::test]
async fn test_geocode_sorts_korea_first_with_local_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Gwangju"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            geocode_entry("Gwangju", "광주", "CN", 30.0, 120.0),
            {"name": "Broken", "country": "KR"},
            geocode_entry("Gwangju", "광주", "KR", 35.1595, 126.8526),
        ])))
        .mount(&server)
        .await;

    let (status, cache, body) = get(app_for(&server), "/api/geocode?q=Gwangju").await;

    assert_eq!(status, StatusCode::OK);
    assert!(cache.is_some());
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["country"], "KR");
    assert_eq!(data[0]["name"], "광주");
    assert_eq!(data[0]["id"], "kr-gwangju-35.1595-126.8526");
    assert_eq!(data[1]["country"], "CN");
}

#[tokio::test]
async fn test_geocode_retries_known_korean_name_in_english() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("lang", "ko"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Seoul"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            geocode_entry("Seoul", "서울", "KR", 37.5666791, 126.9782914),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(app_for(&server), "/api/geocode?q=%20%EC%84%9C%EC%9A%B8%20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "서울");
    assert_eq!(body["data"][0]["id"], "kr-seoul-37.566679-126.978291");
}

#[tokio::test]
async fn test_geocode_no_retry_for_unmapped_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // 서울역 is not in the transliteration table
    let (status, _, body) =
        get(app_for(&server), "/api/geocode?q=%EC%84%9C%EC%9A%B8%EC%97%AD").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_geocode_failed_retry_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("lang", "ko"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, _, body) = get(app_for(&server), "/api/geocode?q=%EB%B6%80%EC%82%B0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_geocode_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let (status, _, body) = get(app_for(&server), "/api/geocode?q=Paris").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API_ERROR");
}

// ============================================================================
// /api/geocode/reverse
// ============================================================================

#[tokio::test]
async fn test_reverse_geocode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            geocode_entry("Jung-gu", "중구", "KR", 37.5640, 126.9970),
        ])))
        .mount(&server)
        .await;

    let (status, _, body) =
        get(app_for(&server), "/api/geocode/reverse?lat=37.564&lon=126.997").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "중구");
    assert_eq!(body["data"][0]["country"], "KR");
}

#[tokio::test]
async fn test_reverse_geocode_validates_coordinates() {
    let server = MockServer::start().await;

    let (status, _, body) = get(app_for(&server), "/api/geocode/reverse?lat=100&lon=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_COORDS");
}
