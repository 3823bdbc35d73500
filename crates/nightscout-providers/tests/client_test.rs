// ABOUTME: HTTP-level tests for the Nightscout client against a mock server
// ABOUTME: Covers credentials, pagination, lenient parsing, and error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use nightscout_core::errors::{ErrorCategory, ErrorCode};
use nightscout_core::models::{DateRange, TreatmentKind};
use nightscout_providers::{NightscoutClient, NightscoutConfig, NightscoutProvider};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHA1_SECRET: &str = "b5e5a2a3e2f4d6c1a8e9f0b1c2d3e4f5a6b7c8d9";

fn client_for(url: &str, secret: Option<&str>) -> NightscoutClient {
    let config = NightscoutConfig::new(url, secret).unwrap().with_paging(3, 5);
    NightscoutClient::with_client(config, reqwest::Client::new())
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()
}

fn entry(at: DateTime<Utc>, sgv: f64) -> Value {
    json!({
        "_id": format!("id-{}", at.timestamp()),
        "sgv": sgv,
        "date": at.timestamp_millis(),
        "dateString": at.to_rfc3339(),
        "direction": "Flat",
        "type": "sgv"
    })
}

#[tokio::test]
async fn test_latest_reading_requests_single_sgv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("count", "1"))
        .and(query_param("find[type]", "sgv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry(t0(), 104.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server.uri(), None)
        .latest_reading()
        .await
        .unwrap()
        .expect("reading");
    assert_eq!(reading.timestamp, t0());
    assert!((reading.value_mgdl - 104.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_latest_reading_empty_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let reading = client_for(&server.uri(), None).latest_reading().await.unwrap();
    assert!(reading.is_none());
}

#[tokio::test]
async fn test_range_pagination_stops_on_short_page() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    let page_one_oldest = t0() + Duration::minutes(40);

    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", range.end().timestamp_millis().to_string()))
        .and(query_param("find[date][$gte]", range.start().timestamp_millis().to_string()))
        .and(query_param("count", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry(t0() + Duration::minutes(50), 120.0),
            entry(t0() + Duration::minutes(45), 118.0),
            entry(page_one_oldest, 115.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", page_one_oldest.timestamp_millis().to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([entry(t0() + Duration::minutes(35), 110.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .readings_in_range(&range)
        .await
        .unwrap();

    let values: Vec<f64> = batch.items.iter().map(|r| r.value_mgdl).collect();
    assert_eq!(values, vec![110.0, 115.0, 118.0, 120.0]);
    assert_eq!(batch.skipped, 0);
}

#[tokio::test]
async fn test_range_pagination_flags_page_limit() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    let newest = t0() + Duration::minutes(50);

    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", range.end().timestamp_millis().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry(newest, 120.0)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", newest.timestamp_millis().to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([entry(t0() + Duration::minutes(40), 115.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = NightscoutConfig::new(&server.uri(), None)
        .unwrap()
        .with_paging(1, 2);
    let batch = NightscoutClient::with_client(config, reqwest::Client::new())
        .readings_in_range(&range)
        .await
        .unwrap();

    assert_eq!(batch.items.len(), 2);
    assert!(batch.truncated);
}

#[tokio::test]
async fn test_range_pagination_not_flagged_when_complete() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([entry(t0() + Duration::minutes(10), 100.0)])),
        )
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .readings_in_range(&range)
        .await
        .unwrap();
    assert_eq!(batch.items.len(), 1);
    assert!(!batch.truncated);
}

#[tokio::test]
async fn test_malformed_oldest_entry_moves_page_cursor() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    let malformed_at = t0() + Duration::minutes(40);

    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", range.end().timestamp_millis().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry(t0() + Duration::minutes(50), 120.0),
            entry(t0() + Duration::minutes(45), 118.0),
            { "date": malformed_at.timestamp_millis(), "type": "sgv" },
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .and(query_param("find[date][$lt]", malformed_at.timestamp_millis().to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([entry(t0() + Duration::minutes(35), 110.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .readings_in_range(&range)
        .await
        .unwrap();

    assert_eq!(batch.items.len(), 3);
    assert_eq!(batch.skipped, 1);
    assert!(!batch.truncated);
}

#[tokio::test]
async fn test_malformed_entry_is_skipped() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry(t0() + Duration::minutes(10), 130.0),
            {"sgv": "not-a-number", "date": "yesterday"},
        ])))
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .readings_in_range(&range)
        .await
        .unwrap();
    assert_eq!(batch.items.len(), 1);
    assert_eq!(batch.skipped, 1);
}

#[tokio::test]
async fn test_entries_outside_range_are_dropped() {
    let server = MockServer::start().await;
    let range = DateRange::new(t0(), t0() + Duration::hours(1)).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry(range.end(), 200.0),
            entry(t0(), 100.0),
            entry(t0() - Duration::minutes(5), 90.0),
        ])))
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .readings_in_range(&range)
        .await
        .unwrap();
    assert_eq!(batch.items.len(), 1);
    assert_eq!(batch.items[0].timestamp, t0());
}

#[tokio::test]
async fn test_non_array_payload_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/entries.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "maintenance"})))
        .mount(&server)
        .await;

    let error = client_for(&server.uri(), None)
        .latest_reading()
        .await
        .unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Parse);
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let error = client_for(&server.uri(), None)
        .server_status()
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(error.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn test_server_error_is_retryable_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devicestatus.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let error = client_for(&server.uri(), None)
        .device_status(5)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert_eq!(error.details["status_code"], 503);
    assert_eq!(error.details["retryable"], true);
}

#[tokio::test]
async fn test_hex_secret_sent_as_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status.json"))
        .and(header("api-secret", SHA1_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "nightscout",
            "version": "15.0.2",
            "apiEnabled": true,
            "settings": {"units": "mg/dl"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client_for(&server.uri(), Some(SHA1_SECRET))
        .server_status()
        .await
        .unwrap();
    assert_eq!(status.version.as_deref(), Some("15.0.2"));
    assert_eq!(status.api_enabled, Some(true));
}

#[tokio::test]
async fn test_url_token_sent_as_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devicestatus.json"))
        .and(query_param("token", "reader-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/?token=reader-abc", server.uri());
    let batch = client_for(&url, None).device_status(5).await.unwrap();
    assert!(batch.items.is_empty());
}

#[tokio::test]
async fn test_url_userinfo_sent_as_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devicestatus.json"))
        .and(header("authorization", "Basic bWU6cHc="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("http://me:pw@{}", server.address());
    client_for(&url, None).device_status(5).await.unwrap();
}

#[tokio::test]
async fn test_treatments_newest_first() {
    let server = MockServer::start().await;
    let since = t0() - Duration::hours(24);
    Mock::given(method("GET"))
        .and(path("/api/v1/treatments.json"))
        .and(query_param("count", "50"))
        .and(query_param("find[created_at][$gte]", "2025-01-09T08:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"created_at": "2025-01-10T06:00:00.000Z", "eventType": "Correction Bolus", "insulin": 1.5},
            {"created_at": "2025-01-10T07:30:00.000Z", "eventType": "Meal Bolus", "insulin": 5, "carbs": 45},
            {"eventType": "Note", "notes": "missing timestamp"}
        ])))
        .mount(&server)
        .await;

    let batch = client_for(&server.uri(), None)
        .treatments_since(since, 50)
        .await
        .unwrap();
    assert_eq!(batch.items.len(), 2);
    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.items[0].kind, TreatmentKind::MealBolus);
    assert_eq!(batch.items[1].kind, TreatmentKind::Bolus);
}
