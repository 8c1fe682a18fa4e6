//! Client side of the app: a typed client for this server's own `/api/*`
//! endpoints, the debounced search selector and the route planner built on
//! top of it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use transport_search::client::{Planner, ProxyClient};
//!
//! let client = ProxyClient::new("http://localhost:3000")?
//!     .with_session_cookie("session_transport-search", &token);
//! let planner = Planner::new(client);
//! let stations = planner.station_selector();
//! stations.input("梅田");
//! ```

mod debounce;
mod planner;
mod selector;
mod source;

use serde::de::DeserializeOwned;
use url::Url;

pub use debounce::Debouncer;
pub use planner::{Planner, PlannerState, RouteView};
pub use selector::{Panel, SearchSelector, SelectorState};
pub use source::{PresetSource, ProxySource, Suggestion, SuggestionSource, preset_destinations};

use crate::error::Error;
use crate::types::{
    Coord, ErrorResponse, Items, LogoutResponse, RouteResult, School, Station, StationId,
};

/// HTTP client for the proxy endpoints served by this crate.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base: Url,
    http: reqwest::Client,
    session: Option<String>,
}

impl ProxyClient {
    /// The base path is treated as a directory: `http://host/app` and
    /// `http://host/app/` both resolve endpoints under `/app/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base: Url = base_url
            .parse()
            .map_err(|e| Error::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            http: reqwest::Client::new(),
            session: None,
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Send `name=token` as the session cookie on every request.
    #[must_use]
    pub fn with_session_cookie(mut self, name: &str, token: &str) -> Self {
        self.session = Some(format!("{name}={token}"));
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /api/stations?word=...`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rejected`] with the server's message on a non-2xx
    /// response, or [`Error::Http`] on network failure.
    pub async fn search_stations(&self, word: &str) -> Result<Vec<Station>, Error> {
        let url = self.endpoint("api/stations", &[("word", word)])?;
        let items: Items<Station> = self.get(url, "failed to search stations").await?;
        Ok(items.items)
    }

    /// `GET /api/schools?word=...`
    ///
    /// # Errors
    ///
    /// See [`search_stations`](Self::search_stations).
    pub async fn search_schools(&self, word: &str) -> Result<Vec<School>, Error> {
        let url = self.endpoint("api/schools", &[("word", word)])?;
        let items: Items<School> = self.get(url, "failed to search schools").await?;
        Ok(items.items)
    }

    /// `GET /api/route?start=...&goalLat=...&goalLon=...`
    ///
    /// # Errors
    ///
    /// See [`search_stations`](Self::search_stations).
    pub async fn route(&self, start: &StationId, goal: Coord) -> Result<RouteResult, Error> {
        let lat = goal.lat.to_string();
        let lon = goal.lon.to_string();
        let url = self.endpoint(
            "api/route",
            &[("start", start.as_str()), ("goalLat", &lat), ("goalLon", &lon)],
        )?;
        self.get(url, "failed to search for a route").await
    }

    /// `POST /api/auth/logout`
    ///
    /// # Errors
    ///
    /// See [`search_stations`](Self::search_stations).
    pub async fn logout(&self) -> Result<LogoutResponse, Error> {
        let url = self.endpoint("api/auth/logout", &[])?;
        let mut request = self.http.post(url);
        if let Some(cookie) = &self.session {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        let response = request.send().await?;
        Self::read(response, "logout failed").await
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| Error::Config(format!("invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, fallback: &str) -> Result<T, Error> {
        let mut request = self.http.get(url);
        if let Some(cookie) = &self.session {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        let response = request.send().await?;
        Self::read(response, fallback).await
    }

    /// Decode a 2xx body, or turn the `{error}` body into [`Error::Rejected`].
    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, Error> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(Error::from);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Err(Error::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Message shown inline for a failed request.
pub(crate) fn inline_message(error: &Error, fallback: &str) -> String {
    match error {
        Error::Rejected { message, .. } | Error::InvalidInput(message) => message.clone(),
        _ => fallback.to_string(),
    }
}
