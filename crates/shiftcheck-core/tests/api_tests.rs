//! API client behaviour against a stub backend.

mod common;

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use shiftcheck_core::api::ApiError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{harness, harness_with_timeout, log_in, sample_json};

#[tokio::test]
async fn test_pending_samples_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/pending"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([sample_json(7), sample_json(9)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    log_in(&h.store, "abc", 1);

    let samples = h.api.list_pending_samples().await;
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].id, 7);
    assert_eq!(samples[0].folio, Some(1007));
    assert_eq!(samples[0].client_id, Some(5));
    assert_eq!(samples[1].exam_name.as_deref(), Some("Biometría hemática"));
    assert!(samples.iter().all(|s| s.is_pending()));
}

#[tokio::test]
async fn test_request_without_token_has_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    assert!(h.api.list_shifts().await.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_server_error_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/pending"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let h = harness(&server);
    log_in(&h.store, "abc", 1);

    assert!(h.api.list_pending_samples().await.is_empty());
    assert!(matches!(
        h.api.try_list_pending_samples().await,
        Err(ApiError::ServerError(body)) if body == "database down"
    ));
}

#[tokio::test]
async fn test_malformed_body_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let h = harness(&server);
    assert!(h.api.list_shifts().await.is_empty());
    assert!(matches!(
        h.api.try_list_shifts().await,
        Err(ApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_null_body_is_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let h = harness(&server);
    assert!(h.api.try_list_shifts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_yields_empty_results() {
    let h = harness_with_timeout("http://127.0.0.1:9/api/", Duration::from_secs(5));
    assert!(h.api.list_pending_samples().await.is_empty());
    assert!(h.api.list_handovers(None, None).await.is_empty());
    assert!(h.api.try_list_active_users().await.unwrap_err().is_transport());
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let h = harness_with_timeout(&common::base_url(&server), Duration::from_millis(200));
    assert!(matches!(h.api.try_list_shifts().await, Err(ApiError::Timeout)));
}

#[tokio::test]
async fn test_shifts_and_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": 1, "Name": "Matutino", "StartTime": "07:00:00", "EndTime": "15:00:00", "IsActive": true},
            {"id": 2, "name": "Vespertino", "startTime": "15:00:00", "endTime": "23:00:00", "isActive": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("isActive", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "tech1", "fullName": "Jane Tech", "email": "jane@lab.mx", "role": "Technician", "isActive": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    log_in(&h.store, "abc", 1);

    let shifts = h.api.list_shifts().await;
    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0].name, "Matutino");
    assert_eq!(shifts[1].time_range(), "15:00 - 23:00");

    let users = h.api.list_active_users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].display_name(), "Jane Tech (tech1)");
    assert_eq!(users[0].email, "jane@lab.mx");
}

#[tokio::test]
async fn test_list_handovers_with_both_bounds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifthandovers"))
        .and(query_param("startDate", "2024-01-01"))
        .and(query_param("endDate", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "shiftId": 1, "shiftName": "Matutino", "userId": 1, "userName": "Jane Tech",
             "handoverDate": "2024-01-10T07:00:00", "notes": "Sin novedades", "pendingSamplesCount": 0, "pendingSamples": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    log_in(&h.store, "abc", 1);

    let handovers = h
        .api
        .list_handovers(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        )
        .await;
    assert_eq!(handovers.len(), 1);
    assert_eq!(handovers[0].notes.as_deref(), Some("Sin novedades"));
}

#[tokio::test]
async fn test_list_handovers_without_bounds_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifthandovers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server);
    assert!(h.api.list_handovers(None, None).await.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_handovers_with_only_end_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shifthandovers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.api
        .list_handovers(None, NaiveDate::from_ymd_opt(2024, 3, 5))
        .await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("endDate=2024-03-05"));
}
