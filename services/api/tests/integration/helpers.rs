use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;

use planner_api::router::build_router;
use planner_api::state::AppState;
use planner_api_migration::Migrator;
use planner_api_schema::users;

pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-integration-tests";

/// Fresh in-memory SQLite database with all migrations applied. Pinned to a
/// single connection so every query sees the same `:memory:` database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, id: i32, email: &str, display_name: &str) {
    users::Entity::insert(users::ActiveModel {
        id: Set(id),
        email: Set(email.to_owned()),
        display_name: Set(display_name.to_owned()),
        is_admin: Set(false),
        created_at: Set(Utc::now()),
    })
    .exec(db)
    .await
    .expect("seed user");
}

pub fn test_state(db: DatabaseConnection) -> AppState {
    AppState {
        db,
        session_secret: TEST_SESSION_SECRET.to_owned(),
        base_url: "http://localhost:3000".to_owned(),
        secure_cookies: false,
        token_retention_hours: 24,
    }
}

/// Full router over a fresh migrated database seeded with Alice (1) and
/// Bob (2). The server keeps cookies between requests, so a consume that
/// sets the session cookie authenticates everything after it.
pub async fn test_server() -> (TestServer, AppState) {
    let db = test_db().await;
    seed_user(&db, 1, "alice@example.com", "Alice").await;
    seed_user(&db, 2, "bob@example.com", "Bob").await;
    let state = test_state(db);
    let server = TestServer::builder()
        .save_cookies()
        .build(build_router(state.clone()))
        .expect("build test server");
    (server, state)
}

/// Run the full magic-link flow for `email`: request a link, consume it, and
/// leave the session cookie in the server's jar.
pub async fn login(server: &TestServer, email: &str) {
    let response = server
        .post("/api/auth/request")
        .json(&serde_json::json!({ "email": email }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let login_url = body["loginUrl"].as_str().expect("loginUrl in response");
    let token = login_url
        .split("token=")
        .nth(1)
        .expect("token in login url");

    let response = server
        .get(&format!("/api/auth/consume?token={token}"))
        .await;
    response.assert_status(axum::http::StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}
