use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::Error;
use crate::types::ErrorResponse;
use crate::upstream::Operation;

/// A failed proxy call, rendered as `{error}` JSON with the matching status.
#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    error: Error,
}

impl ApiError {
    #[must_use]
    pub fn new(operation: Operation, error: Error) -> Self {
        Self { operation, error }
    }

    /// Status code and user-facing message for this failure.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.error {
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound => (StatusCode::NOT_FOUND, "no route was found".into()),
            Error::Forbidden { .. } => (
                StatusCode::FORBIDDEN,
                "API authentication error. Check the API key and subscription".into(),
            ),
            Error::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "API rate limit reached. Please wait a moment and try again".into(),
            ),
            Error::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                "The request timed out. Please try again".into(),
            ),
            Error::MissingApiKey | Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server configuration error".into(),
            ),
            Error::Malformed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read route information".into(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.fallback_message().into()),
        }
    }

    fn fallback_message(&self) -> &'static str {
        match self.operation {
            Operation::StationSearch => "failed to search stations",
            Operation::SchoolSearch => "failed to search schools",
            Operation::RouteSearch => "failed to search for a route",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                error = %self.error,
                "Proxy request failed"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                error = %self.error,
                "Proxy request rejected"
            );
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
