//! Proxy endpoints: `/api/stations`, `/api/schools`, `/api/route`.
//!
//! Each handler validates its query, makes at most one upstream call and
//! reshapes the result. Validation failures never reach the network.

mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use error::ApiError;

use crate::upstream::NavitimeClient;

/// Shared state for proxy handlers.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) navitime: Arc<NavitimeClient>,
}

impl ApiState {
    #[must_use]
    pub fn new(navitime: NavitimeClient) -> Self {
        Self {
            navitime: Arc::new(navitime),
        }
    }
}

/// Create the proxy router.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/api/stations", get(handlers::stations))
        .route("/api/schools", get(handlers::schools))
        .route("/api/route", get(handlers::route))
        .with_state(state)
}
