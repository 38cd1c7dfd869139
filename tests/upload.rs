use chrono::{TimeZone, Utc};

use pisense::config::ApiConfig;
use pisense::data_mgmt::models::{Reading, ReadingKind};
use pisense::data_mgmt::payload::TelemetryPayload;
use pisense::helpers::ThreadDelay;
use pisense::interfaces::http_api;

fn cycle_payload() -> TelemetryPayload {
    let ts = Utc.with_ymd_and_hms(2026, 8, 7, 6, 30, 0).unwrap();
    let readings = vec![
        Reading::new(ReadingKind::InternalTemp, 48.312, ts),
        Reading::new(ReadingKind::ExternalTemp, 21.7, ts),
        Reading::new(ReadingKind::Humidity, 54.2, ts),
        Reading::new(ReadingKind::LightResistance, 1834.0, ts),
    ];
    TelemetryPayload::from_readings(ts, &readings).unwrap()
}

#[test]
fn test_cycle_payload_delivery() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/v1/readings")
        .match_header("Authorization", "0123456789abcdef")
        .match_header("Content-Type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "timestamp": "2026-08-07T06:30:00+00:00",
            "int_temp": 48.312,
            "ext_temp": 21.7,
            "humidity": 54.2,
            "resistance": 1834.0,
        })))
        .with_status(201)
        .with_body(r#"{"message": "created"}"#)
        .expect(1)
        .create();

    let api = ApiConfig {
        endpoint: format!("{}/v1/readings", server.url()),
        api_key: "0123456789abcdef".to_string(),
        timeout: 5,
        max_retries: 10,
    };
    http_api::write(&cycle_payload(), &api, &mut ThreadDelay);
    m.assert();
}

#[test]
fn test_rejected_payload_is_not_retried() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/v1/readings")
        .with_status(422)
        .with_body(r#"{"error": "unknown sensor id"}"#)
        .expect(1)
        .create();

    let api = ApiConfig {
        endpoint: format!("{}/v1/readings", server.url()),
        api_key: "0123456789abcdef".to_string(),
        timeout: 5,
        max_retries: 10,
    };
    http_api::write(&cycle_payload(), &api, &mut ThreadDelay);
    m.assert();
}
