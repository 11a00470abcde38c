pub mod auth;
pub mod availability;
pub mod calendar;
pub mod event;

use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use planner_session::cookie::read_session_from_cookies;

use crate::error::ApiError;
use crate::state::AppState;

/// Handler for `GET /readyz` — ready only when the database answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Verified session or 401. Why the session is absent (no cookie, tampering,
/// rotation) is deliberately not distinguishable.
pub(crate) fn require_user(jar: &CookieJar, state: &AppState) -> Result<i32, ApiError> {
    current_user_id(jar, state).ok_or(ApiError::Unauthorized)
}

pub(crate) fn current_user_id(jar: &CookieJar, state: &AppState) -> Option<i32> {
    read_session_from_cookies(jar, &state.session_secret).map(|s| s.user_id)
}
