use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie the auth server sets when it delivers the token by cookie.
pub(super) const DELIVERED_TOKEN_COOKIE: &str = "auth_token";

/// Legacy session cookie names, read after the primary one.
///
/// Migration shim: earlier deployments shared `session`/`auth_token` across
/// projects. They are still read and always cleared, but never written.
/// Drop them once every client has re-authenticated under
/// `session_{PROJECT_ID}` (one session TTL after rollout).
const LEGACY_SESSION_COOKIES: [&str; 2] = ["session", DELIVERED_TOKEN_COOKIE];

/// Primary, project-scoped session cookie name.
#[must_use]
pub fn session_cookie_name(project_id: &str) -> String {
    format!("session_{project_id}")
}

/// Session cookie names in lookup priority order.
#[must_use]
pub fn session_candidates(project_id: &str) -> [String; 3] {
    [
        session_cookie_name(project_id),
        LEGACY_SESSION_COOKIES[0].to_string(),
        LEGACY_SESSION_COOKIES[1].to_string(),
    ]
}

/// First session token present among the candidates.
pub(super) fn find_session_token(jar: &CookieJar, project_id: &str) -> Option<String> {
    session_candidates(project_id)
        .iter()
        .find_map(|name| jar.get(name))
        .map(|c| c.value().to_string())
}

/// Create session cookie.
pub(super) fn session_cookie(
    name: &str,
    token: &str,
    ttl_days: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::days(ttl_days))
        .build()
}

/// Create removal cookie for session.
pub(super) fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Emit removal cookies for every candidate name.
///
/// Uses `add` rather than `remove` so the removal is sent even when the
/// request did not carry the cookie.
pub(super) fn clear_all(jar: CookieJar, project_id: &str) -> CookieJar {
    session_candidates(project_id)
        .iter()
        .fold(jar, |jar, name| jar.add(clear_session_cookie(name)))
}
