use axum::extract::{Request, State};
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use url::Url;

use super::config::AuthSettings;
use super::cookies;
use super::state::AuthState;
use super::traits::SessionVerifier;

/// Path prefixes the gate never intercepts: API routes, static assets and
/// the favicon. API handlers apply their own checks where needed.
const UNGATED_PREFIXES: &[&str] = &["/api/", "/static/", "/favicon.ico"];

/// Public pages that live inside the gated space.
const PUBLIC_PREFIXES: &[&str] = &[
    "/auth/callback",
    "/auth/error",
    "/api/auth/logout",
    "/static",
    "/favicon.ico",
];

/// Outcome of gating one request.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Decision {
    /// Public or never-intercepted path.
    Exempt,
    /// Session token verified.
    Allow,
    /// Send the browser to the external login page. When `clear_cookies` is
    /// set, every session cookie variant is removed as well.
    RedirectLogin { login: String, clear_cookies: bool },
}

pub(super) fn is_exempt(path: &str) -> bool {
    path == "/api"
        || UNGATED_PREFIXES.iter().any(|p| path.starts_with(p))
        || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// External login URL carrying `redirect={original request URL}`.
///
/// The original URL is the base URL followed by the request path and query,
/// concatenated as-is: no reference resolution, so `//host/...` paths stay on
/// this app and a base path prefix is kept.
pub(super) fn login_redirect(settings: &AuthSettings, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let base = settings.app_base_url.as_str().trim_end_matches('/');
    let original = format!("{base}{path_and_query}");

    let mut login: Url = settings.login_url.clone();
    login.query_pairs_mut().append_pair("redirect", &original);
    login.into()
}

pub(super) async fn decide<V: SessionVerifier>(
    state: &AuthState<V>,
    uri: &Uri,
    jar: &CookieJar,
) -> Decision {
    if is_exempt(uri.path()) {
        return Decision::Exempt;
    }

    let Some(token) = cookies::find_session_token(jar, &state.settings.project_id) else {
        tracing::debug!(path = uri.path(), "No session cookie");
        return Decision::RedirectLogin {
            login: login_redirect(&state.settings, uri),
            clear_cookies: false,
        };
    };

    match state.verifier.verify(&token).await {
        Ok(()) => Decision::Allow,
        Err(e) => {
            tracing::warn!(error = %e, path = uri.path(), "Session verification failed");
            Decision::RedirectLogin {
                login: login_redirect(&state.settings, uri),
                clear_cookies: true,
            }
        }
    }
}

/// Gate middleware: passes exempt and verified requests through, redirects
/// everything else to the external login page.
pub(super) async fn require_session<V: SessionVerifier>(
    State(state): State<AuthState<V>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let decision = decide(&state, request.uri(), &jar).await;
    match decision {
        Decision::Exempt | Decision::Allow => next.run(request).await,
        Decision::RedirectLogin {
            login,
            clear_cookies: false,
        } => Redirect::to(&login).into_response(),
        Decision::RedirectLogin {
            login,
            clear_cookies: true,
        } => {
            let jar = cookies::clear_all(jar, &state.settings.project_id);
            (jar, Redirect::to(&login)).into_response()
        }
    }
}
