use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use url::Url;

use super::config::AuthConfig;
use super::cookies;
use super::error::AuthError;
use super::gate;
use super::state::AuthState;
use super::traits::SessionVerifier;
use crate::types::LogoutResponse;

/// Create the auth router: `/auth/callback` and `/api/auth/logout`.
pub fn auth_routes<V: SessionVerifier>(config: AuthConfig, verifier: V) -> Router {
    routes(AuthState::new(config, verifier))
}

/// Mount the auth routes on `app` and put every route behind the gate.
pub fn with_auth<V: SessionVerifier>(app: Router, config: AuthConfig, verifier: V) -> Router {
    let state = AuthState::new(config, verifier);
    app.merge(routes(state.clone()))
        .layer(from_fn_with_state(state, gate::require_session::<V>))
}

fn routes<V: SessionVerifier>(state: AuthState<V>) -> Router {
    Router::new()
        .route("/auth/callback", get(callback::<V>))
        .route("/api/auth/logout", post(logout::<V>))
        .with_state(state)
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    token: Option<String>,
    redirect: Option<String>,
    error: Option<String>,
}

async fn callback<V: SessionVerifier>(
    State(state): State<AuthState<V>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), AuthError> {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        tracing::warn!(error = %error, "Auth server reported an error");
        return Err(AuthError::Callback(error));
    }

    let token = params
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| {
            jar.get(cookies::DELIVERED_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
        })
        .ok_or_else(|| {
            tracing::warn!("Callback without a token");
            AuthError::Callback("authentication token not found".into())
        })?;

    state.verifier.verify(&token).await.map_err(|e| {
        tracing::error!(error = %e, "Token verification failed");
        AuthError::Callback("token verification failed".into())
    })?;

    let target = params
        .redirect
        .as_deref()
        .and_then(|r| Url::parse(r).ok())
        .map_or_else(|| "/".to_string(), String::from);

    let session_cookie = cookies::session_cookie(
        &state.settings.session_cookie_name(),
        &token,
        state.settings.session_ttl_days,
        state.settings.secure_cookies,
    );

    tracing::info!(project_id = %state.settings.project_id, "Session established");

    Ok((jar.add(session_cookie), Redirect::to(&target)))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout<V: SessionVerifier>(
    State(state): State<AuthState<V>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let jar = cookies::clear_all(jar, &state.settings.project_id);
    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "logged out".into(),
        }),
    )
}
