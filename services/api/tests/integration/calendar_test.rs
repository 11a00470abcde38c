use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{login, test_server};

async fn seed_calendar(server: &axum_test::TestServer) -> i64 {
    login(server, "alice@example.com").await;
    server
        .post("/api/availability")
        .json(&json!({ "startDate": "2026-09-01", "endDate": "2026-09-03", "reason": "away" }))
        .await
        .assert_status(StatusCode::CREATED);
    let response = server
        .post("/api/events")
        .json(&json!({
            "title": "Dinner",
            "start": "2026-09-10T18:00:00Z",
            "end": "2026-09-10T21:00:00Z",
            "invitees": [2]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let event: serde_json::Value = response.json();
    event["id"].as_i64().unwrap()
}

#[tokio::test]
async fn should_merge_availability_and_events_for_the_owner() {
    let (server, _) = test_server().await;
    seed_calendar(&server).await;

    let response = server.get("/api/calendar").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["currentUserId"], 1);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let availability = items.iter().find(|i| i["kind"] == "availability").unwrap();
    assert_eq!(availability["userName"], "Alice");
    assert_eq!(availability["color"], "gray");
    assert_eq!(availability["canEdit"], true);

    let event = items.iter().find(|i| i["kind"] == "event").unwrap();
    assert_eq!(event["title"], "Dinner");
    assert_eq!(event["color"], "blue");
    assert_eq!(event["canEdit"], true);
    assert_eq!(event["rsvpStatus"], "going");
}

#[tokio::test]
async fn should_serve_feed_anonymously_without_viewer_fields() {
    let (mut server, _) = test_server().await;
    seed_calendar(&server).await;
    server.clear_cookies();

    let response = server.get("/api/calendar").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["currentUserId"], serde_json::Value::Null);
    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|i| i["canEdit"] == false));
    let event = items.iter().find(|i| i["kind"] == "event").unwrap();
    assert_eq!(event["rsvpStatus"], serde_json::Value::Null);
}

#[tokio::test]
async fn should_scope_viewer_fields_to_the_session() {
    let (mut server, _) = test_server().await;
    let event_id = seed_calendar(&server).await;

    server.clear_cookies();
    login(&server, "bob@example.com").await;
    server
        .post(&format!("/api/events/{event_id}/rsvp"))
        .json(&json!({ "status": "maybe" }))
        .await
        .assert_status_ok();

    let response = server.get("/api/calendar").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["currentUserId"], 2);

    let items = body["items"].as_array().unwrap();
    let availability = items.iter().find(|i| i["kind"] == "availability").unwrap();
    // Alice's blocked period is visible to Bob but not editable.
    assert_eq!(availability["canEdit"], false);

    let event = items.iter().find(|i| i["kind"] == "event").unwrap();
    assert_eq!(event["canEdit"], false);
    assert_eq!(event["rsvpStatus"], "maybe");
}
