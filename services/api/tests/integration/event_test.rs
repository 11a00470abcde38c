use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{login, test_server};

async fn create_event(server: &axum_test::TestServer, body: serde_json::Value) -> serde_json::Value {
    let response = server.post("/api/events").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn dinner() -> serde_json::Value {
    json!({
        "title": "Dinner",
        "description": "Team dinner",
        "location": "Downtown",
        "start": "2026-09-10T18:00:00Z",
        "end": "2026-09-10T21:00:00Z",
        "invitees": [2]
    })
}

#[tokio::test]
async fn should_create_event_with_creator_going_and_invitees_invited() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;

    let event = create_event(&server, dinner()).await;
    assert_eq!(event["createdBy"], 1);
    assert_eq!(event["creatorName"], "Alice");
    assert_eq!(event["status"], "proposed");
    assert_eq!(event["start"], "2026-09-10T18:00:00.000Z");

    let attendees = event["attendees"].as_array().unwrap();
    assert_eq!(attendees.len(), 2);
    let alice = attendees.iter().find(|a| a["userId"] == 1).unwrap();
    let bob = attendees.iter().find(|a| a["userId"] == 2).unwrap();
    assert_eq!(alice["status"], "going");
    assert_eq!(bob["status"], "invited");
}

#[tokio::test]
async fn should_reject_event_with_inverted_times() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;

    let response = server
        .post("/api/events")
        .json(&json!({
            "title": "Backwards",
            "start": "2026-09-10T21:00:00Z",
            "end": "2026-09-10T18:00:00Z"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_get_event_and_404_unknown() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let event = create_event(&server, dinner()).await;
    let id = event["id"].as_i64().unwrap();

    let response = server.get(&format!("/api/events/{id}")).await;
    response.assert_status_ok();
    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["title"], "Dinner");

    let response = server.get("/api/events/9999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_list_events_overlapping_range() {
    let (server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    create_event(&server, dinner()).await;
    create_event(
        &server,
        json!({
            "title": "Brunch",
            "start": "2026-10-01T10:00:00Z",
            "end": "2026-10-01T12:00:00Z"
        }),
    )
    .await;

    let response = server
        .get("/api/events?from=2026-09-01T00:00:00Z&to=2026-09-30T00:00:00Z")
        .await;
    response.assert_status_ok();
    let events: serde_json::Value = response.json();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Dinner");
}

#[tokio::test]
async fn should_let_only_the_creator_update() {
    let (mut server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let event = create_event(&server, dinner()).await;
    let id = event["id"].as_i64().unwrap();

    server.clear_cookies();
    login(&server, "bob@example.com").await;
    let response = server
        .patch(&format!("/api/events/{id}"))
        .json(&json!({ "title": "Hijacked" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    server.clear_cookies();
    login(&server, "alice@example.com").await;
    let response = server
        .patch(&format!("/api/events/{id}"))
        .json(&json!({ "title": "Dinner v2", "status": "confirmed" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["title"], "Dinner v2");
    assert_eq!(updated["status"], "confirmed");
    // Untouched fields survive the patch.
    assert_eq!(updated["location"], "Downtown");
}

#[tokio::test]
async fn should_preserve_rsvps_when_invitees_change() {
    let (mut server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let event = create_event(&server, dinner()).await;
    let id = event["id"].as_i64().unwrap();

    // Bob accepts.
    server.clear_cookies();
    login(&server, "bob@example.com").await;
    server
        .post(&format!("/api/events/{id}/rsvp"))
        .json(&json!({ "status": "going" }))
        .await
        .assert_status_ok();

    // Alice re-sends the same invitee list; Bob's RSVP must survive.
    server.clear_cookies();
    login(&server, "alice@example.com").await;
    let response = server
        .patch(&format!("/api/events/{id}"))
        .json(&json!({ "invitees": [2] }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    let bob = updated["attendees"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["userId"] == 2)
        .unwrap()
        .clone();
    assert_eq!(bob["status"], "going");

    // Dropping Bob removes him but keeps the creator.
    let response = server
        .patch(&format!("/api/events/{id}"))
        .json(&json!({ "invitees": [] }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    let attendees = updated["attendees"].as_array().unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0]["userId"], 1);
}

#[tokio::test]
async fn should_upsert_rsvp_and_return_attendees() {
    let (mut server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let event = create_event(&server, dinner()).await;
    let id = event["id"].as_i64().unwrap();

    server.clear_cookies();
    login(&server, "bob@example.com").await;
    let response = server
        .post(&format!("/api/events/{id}/rsvp"))
        .json(&json!({ "status": "maybe" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    let bob = body["attendees"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["userId"] == 2)
        .unwrap()
        .clone();
    assert_eq!(bob["status"], "maybe");
    assert_eq!(bob["name"], "Bob");
    assert!(bob["updatedAt"].as_str().unwrap().ends_with('Z'));

    // Changing the answer overwrites, not duplicates.
    let response = server
        .post(&format!("/api/events/{id}/rsvp"))
        .json(&json!({ "status": "declined" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["attendees"].as_array().unwrap().len(), 2);

    let response = server
        .post(&format!("/api/events/{id}/rsvp"))
        .json(&json!({ "status": "partying" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_let_only_the_creator_delete() {
    let (mut server, _) = test_server().await;
    login(&server, "alice@example.com").await;
    let event = create_event(&server, dinner()).await;
    let id = event["id"].as_i64().unwrap();

    server.clear_cookies();
    login(&server, "bob@example.com").await;
    let response = server.delete(&format!("/api/events/{id}")).await;
    response.assert_status(StatusCode::FORBIDDEN);

    server.clear_cookies();
    login(&server, "alice@example.com").await;
    let response = server.delete(&format!("/api/events/{id}")).await;
    response.assert_status_ok();

    let response = server.get(&format!("/api/events/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
