//! Cookie builders for the session.
//!
//! One cookie, HTTP-only, `SameSite=Lax`, path `/`. `Secure` is the caller's
//! call (on in production, off for local HTTP).

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::codec::{self, SessionPayload};

/// Cookie name for the signed session value.
pub const SESSION_COOKIE: &str = "session";

/// Default session cookie Max-Age in seconds (30 days).
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Sign the payload and set it as the session cookie, replacing any prior
/// value for the name.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use planner_session::SessionPayload;
/// use planner_session::cookie::{SESSION_COOKIE, SESSION_MAX_AGE_SECS, set_session_cookie};
///
/// let payload = SessionPayload { user_id: 1, issued_at: 0 };
/// let jar = set_session_cookie(CookieJar::new(), &payload, "secret", true, SESSION_MAX_AGE_SECS);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(SESSION_MAX_AGE_SECS)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    payload: &SessionPayload,
    secret: &str,
    secure: bool,
    max_age_secs: i64,
) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, codec::sign(payload, secret)))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0. A no-op for clients
/// that never had one.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use planner_session::cookie::{SESSION_COOKIE, clear_session_cookie};
///
/// let jar = clear_session_cookie(CookieJar::new());
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read and verify the session cookie. Absent, malformed, or tampered
/// cookies all read as "no session" — callers cannot tell why.
pub fn read_session_from_cookies(jar: &CookieJar, secret: &str) -> Option<SessionPayload> {
    let value = jar.get(SESSION_COOKIE)?.value().to_owned();
    codec::verify(&value, secret)
}
