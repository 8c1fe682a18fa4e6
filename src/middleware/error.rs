use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::pages::AUTH_ERROR_PATH;

/// Authentication errors for the middleware layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Callback could not establish a session; the message is shown on the
    /// error page.
    #[error("Callback error: {0}")]
    Callback(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Callback(ref msg) => {
                let encoded = urlencoding::encode(msg);
                Redirect::to(&format!("{AUTH_ERROR_PATH}?message={encoded}")).into_response()
            }
            Self::Config(_) => {
                tracing::error!(error = %self, "Auth internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
