//! OpenWeather and IP-geolocation clients against a mock HTTP server.

use smartweather_core::{
    Dashboard, ForecastSection, IpLocator, OpenWeatherClient, Session, WeatherError,
    WeatherSource, aggregate_in, advisory,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 83.2185, "lat": 17.6805},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
        "main": {
            "temp": 301.15,
            "feels_like": 304.2,
            "temp_min": 301.15,
            "temp_max": 301.15,
            "pressure": 1011,
            "humidity": 74
        },
        "wind": {"speed": 3.09, "deg": 150},
        "dt": 1_705_300_000,
        "name": "Visakhapatnam",
        "cod": 200
    })
}

/// Eight 3-hourly samples over two UTC days: 20,22,24,26 then 30,31,29,30 °C.
fn forecast_body() -> serde_json::Value {
    let base = 1_705_276_800_i64; // 2024-01-15T00:00:00Z
    let temps = [20.0, 22.0, 24.0, 26.0, 30.0, 31.0, 29.0, 30.0];
    let offsets = [0, 3, 6, 9, 24, 27, 30, 33];

    let list: Vec<serde_json::Value> = temps
        .iter()
        .zip(offsets)
        .map(|(t, h)| {
            serde_json::json!({
                "dt": base + h * 3600,
                "main": {"temp": t + 273.15, "humidity": 60},
                "weather": [{"description": "clear sky"}],
                "dt_txt": "ignored"
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": list.len(),
        "list": list,
        "city": {"name": "Visakhapatnam", "country": "IN"}
    })
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new("TEST_KEY".to_string(), &server.uri(), 5).expect("client")
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn current_conditions_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Visakhapatnam"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;

    let c = client(&server).fetch_current("Visakhapatnam").await.unwrap();

    assert_eq!(c.city, "Visakhapatnam");
    assert_eq!(c.temperature_c, 28.0);
    assert_eq!(c.feels_like_c, 31.05);
    assert_eq!(c.humidity_pct, 74);
    assert_eq!(c.pressure_hpa, 1011);
    assert_eq!(c.description, "haze");
    assert_eq!(advisory::current_advisory(&c).message, advisory::LOW_VISIBILITY);
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/weather",
        ResponseTemplate::new(404)
            .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
    )
    .await;

    let err = client(&server).fetch_current("Atlantis").await.unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
    assert_eq!(err.user_message(), "City not found or API issue.");
}

#[tokio::test]
async fn html_error_page_is_malformed() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .await;

    let err = client(&server).fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Nothing listens on port 9 of localhost.
    let client = OpenWeatherClient::new("K".into(), "http://127.0.0.1:9", 2).expect("client");

    let err = client.fetch_current("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Transport(_)), "got {err:?}");

    let err = client.fetch_forecast("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::Transport(_)), "got {err:?}");
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_envelope_is_returned_verbatim_and_aggregates() {
    let server = MockServer::start().await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;

    let envelope = client(&server).fetch_forecast("Visakhapatnam").await.unwrap();
    assert!(envelope.is_ok());
    assert_eq!(envelope.list.len(), 8);

    let report = aggregate_in(&envelope.into_checked().unwrap(), &chrono::Utc);
    assert_eq!(report.daily_averages.len(), 2);
    assert!((report.daily_averages[0].mean_temperature_c - 23.0).abs() < 1e-9);
    assert!((report.daily_averages[1].mean_temperature_c - 30.0).abs() < 1e-9);

    let mean = report.mean_temperature().unwrap();
    assert!((mean - 26.5).abs() < 1e-9);

    let outlook = advisory::forecast_outlook(&report);
    assert_eq!(outlook.len(), 1);
    assert_eq!(outlook[0].message, advisory::PLEASANT_WEEK);
}

#[tokio::test]
async fn refused_forecast_is_ok_envelope_with_status() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/forecast",
        ResponseTemplate::new(401)
            .set_body_json(serde_json::json!({"cod": 401, "message": "Invalid API key."})),
    )
    .await;

    let envelope = client(&server).fetch_forecast("London").await.unwrap();
    assert!(!envelope.is_ok());
    assert!(matches!(
        envelope.into_checked(),
        Err(WeatherError::ForecastUnavailable { .. })
    ));
}

#[tokio::test]
async fn empty_forecast_list_is_not_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/forecast",
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"cod": "200", "message": 0, "cnt": 0, "list": []})),
    )
    .await;

    let envelope = client(&server).fetch_forecast("Nowhere").await.unwrap();
    let report = aggregate_in(&envelope.into_checked().unwrap(), &chrono::Utc);
    assert!(report.daily_averages.is_empty());
    assert!(report.series.is_empty());
    assert!(advisory::forecast_outlook(&report).is_empty());
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn dashboard_loads_both_sections_and_records_session() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;

    let dashboard = Dashboard::new(client(&server));
    let mut session = Session::new();
    let report = dashboard.refresh(&mut session, "Visakhapatnam").await.unwrap();

    assert_eq!(session.last_searched(), Some("Visakhapatnam"));
    assert_eq!(report.conditions.city, "Visakhapatnam");
    let ForecastSection::Ready { report: forecast, .. } = &report.forecast else {
        panic!("expected forecast");
    };
    assert_eq!(forecast.series.len(), 8);
}

#[tokio::test]
async fn dashboard_reports_unparseable_forecast() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_string("not json")).await;

    let report = Dashboard::new(client(&server)).load("Visakhapatnam").await.unwrap();
    assert!(matches!(
        report.forecast,
        ForecastSection::Unavailable(WeatherError::Malformed(_))
    ));
}

// ============================================================================
// IP geolocation
// ============================================================================

#[tokio::test]
async fn ip_locator_returns_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "success", "country": "India", "city": "Hyderabad"}),
        ))
        .mount(&server)
        .await;

    let locator = IpLocator::new(&format!("{}/json", server.uri()), 5).unwrap();
    assert_eq!(locator.detect_city().await.unwrap().as_deref(), Some("Hyderabad"));
    assert_eq!(locator.detect_city_or("Visakhapatnam").await, "Hyderabad");
}

#[tokio::test]
async fn ip_locator_falls_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "fail", "message": "private range"}),
        ))
        .mount(&server)
        .await;

    let locator = IpLocator::new(&format!("{}/json", server.uri()), 5).unwrap();
    let err = locator.detect_city().await.unwrap_err();
    assert!(matches!(err, WeatherError::Geolocation(ref m) if m == "private range"));
    assert_eq!(locator.detect_city_or("Visakhapatnam").await, "Visakhapatnam");
}
