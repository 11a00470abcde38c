use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planner_core::serde::to_rfc3339_ms;
use planner_session::SessionPayload;
use planner_session::cookie::{SESSION_MAX_AGE_SECS, clear_session_cookie, set_session_cookie};

use crate::domain::repository::UserRepository;
use crate::domain::types::ConsumeOutcome;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::login_token::{
    ConsumeLoginTokenUseCase, CreateLoginTokenInput, CreateLoginTokenUseCase,
};

#[derive(Deserialize)]
pub struct RequestLoginLinkRequest {
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub display_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLoginLinkResponse {
    pub login_url: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// `POST /api/auth/request` — issue a login token and hand back the magic
/// link. Delivery (email) is out of band; the caller gets the URL directly.
pub async fn request_login_link(
    State(state): State<AppState>,
    Json(body): Json<RequestLoginLinkRequest>,
) -> Result<Json<RequestLoginLinkResponse>, ApiError> {
    let usecase = CreateLoginTokenUseCase {
        users: state.user_repo(),
        tokens: state.login_token_repo(),
    };
    let created = usecase
        .execute(CreateLoginTokenInput {
            email: body.email,
            ttl_minutes: None,
        })
        .await?;

    let login_url = format!(
        "{}/api/auth/consume?token={}",
        state.base_url.trim_end_matches('/'),
        created.token
    );
    Ok(Json(RequestLoginLinkResponse {
        login_url,
        expires_at: created.expires_at,
        user: UserSummary {
            id: created.user.id,
            email: created.user.email,
            display_name: created.user.display_name,
        },
    }))
}

#[derive(Deserialize)]
pub struct ConsumeParams {
    pub token: Option<String>,
}

/// `GET /api/auth/consume?token=` — browser-facing endpoint behind the magic
/// link. Success establishes the session and lands on the app root; every
/// failure lands on the login page with a distinct `error` query value.
pub async fn consume_login_link(
    State(state): State<AppState>,
    Query(params): Query<ConsumeParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return Ok((jar, Redirect::to("/login?error=missing_token")));
    };

    let usecase = ConsumeLoginTokenUseCase {
        tokens: state.login_token_repo(),
    };
    match usecase.execute(&token).await? {
        ConsumeOutcome::Granted { user_id } => {
            // The user row may have been deleted between issuance and click.
            if state.user_repo().find_by_id(user_id).await?.is_none() {
                return Ok((jar, Redirect::to("/login?error=user_missing")));
            }
            let payload = SessionPayload {
                user_id,
                issued_at: Utc::now().timestamp_millis(),
            };
            // Clear then set so a stale cookie cannot linger next to the
            // fresh one.
            let jar = clear_session_cookie(jar);
            let jar = set_session_cookie(
                jar,
                &payload,
                &state.session_secret,
                state.secure_cookies,
                SESSION_MAX_AGE_SECS,
            );
            Ok((jar, Redirect::to("/")))
        }
        ConsumeOutcome::Rejected(reason) => Ok((
            jar,
            Redirect::to(&format!("/login?error={}", reason.as_str())),
        )),
    }
}

/// `POST /api/auth/logout` — clear the session cookie. Idempotent; works for
/// anonymous callers too.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    (
        clear_session_cookie(jar),
        Json(serde_json::json!({ "ok": true })),
    )
}
