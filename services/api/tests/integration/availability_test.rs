use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{login, test_server};

#[tokio::test]
async fn should_create_and_list_own_periods() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;

    let response = server
        .post("/api/availability")
        .json(&json!({
            "startDate": "2026-09-01",
            "endDate": "2026-09-05",
            "reason": "holiday"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["userId"], 1);
    assert_eq!(created["startDate"], "2026-09-01");
    assert_eq!(created["endDate"], "2026-09-05");
    assert_eq!(created["reason"], "holiday");

    let response = server.get("/api/availability/me").await;
    response.assert_status_ok();
    let periods: serde_json::Value = response.json();
    assert_eq!(periods.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_filter_periods_by_range_overlap() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;

    for (start, end) in [("2026-09-01", "2026-09-05"), ("2026-10-01", "2026-10-02")] {
        server
            .post("/api/availability")
            .json(&json!({ "startDate": start, "endDate": end }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .get("/api/availability/me?from=2026-09-04&to=2026-09-30")
        .await;
    response.assert_status_ok();
    let periods: serde_json::Value = response.json();
    let periods = periods.as_array().unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["startDate"], "2026-09-01");
}

#[tokio::test]
async fn should_reject_inverted_range() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;

    let response = server
        .post("/api/availability")
        .json(&json!({ "startDate": "2026-09-05", "endDate": "2026-09-01" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_INPUT");
}

#[tokio::test]
async fn should_require_session_for_availability_routes() {
    let (server, _) = test_server().await;
    let response = server
        .post("/api/availability")
        .json(&json!({ "startDate": "2026-09-01", "endDate": "2026-09-05" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_deleting_someone_elses_period() {
    let (mut server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let response = server
        .post("/api/availability")
        .json(&json!({ "startDate": "2026-09-01", "endDate": "2026-09-05" }))
        .await;
    let created: serde_json::Value = response.json();
    let id = created["id"].as_i64().unwrap();

    server.clear_cookies();
    login(&server, "bob@example.com").await;
    let response = server.delete(&format!("/api/availability/{id}")).await;
    response.assert_status(StatusCode::FORBIDDEN);

    server.clear_cookies();
    login(&server, "alice@example.com").await;
    let response = server.delete(&format!("/api/availability/{id}")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let response = server.delete(&format!("/api/availability/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
