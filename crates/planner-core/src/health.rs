use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness only. Readiness lives in the
/// service, which knows how to probe its own database.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
