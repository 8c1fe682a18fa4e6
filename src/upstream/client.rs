use std::time::Duration;

use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::macros::format_description;
use url::Url;

use super::Operation;
use super::shape;
use super::types::{RouteResponse, SpotResponse, TransportResponse};
use crate::error::Error;
use crate::types::{RouteQuery, RouteResult, School, SearchWord, Station};

/// Hard per-call timeout, independent of the HTTP client's own settings.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Spot search result cap.
const SPOT_LIMIT: &str = "10";

/// NAVITIME endpoint configuration.
///
/// The API key is optional at construction so the server can start without
/// it; every call then fails with [`Error::MissingApiKey`] instead.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct NavitimeConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) transport_url: Url,
    pub(crate) spot_url: Url,
    pub(crate) route_url: Url,
    pub(crate) timeout: Duration,
}

impl NavitimeConfig {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            transport_url: "https://navitime-transport.p.rapidapi.com/transport_node/autocomplete"
                .parse()
                .expect("valid default URL"),
            spot_url: "https://navitime-spot.p.rapidapi.com/spot"
                .parse()
                .expect("valid default URL"),
            route_url: "https://navitime-route-totalnavi.p.rapidapi.com/route_transit"
                .parse()
                .expect("valid default URL"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the station autocomplete endpoint.
    #[must_use]
    pub fn with_transport_url(mut self, url: Url) -> Self {
        self.transport_url = url;
        self
    }

    /// Override the spot search endpoint.
    #[must_use]
    pub fn with_spot_url(mut self, url: Url) -> Self {
        self.spot_url = url;
        self
    }

    /// Override the transit route endpoint.
    #[must_use]
    pub fn with_route_url(mut self, url: Url) -> Self {
        self.route_url = url;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Client for the three NAVITIME APIs. One outbound request per call, no retry.
#[derive(Clone)]
pub struct NavitimeClient {
    config: NavitimeConfig,
    http: reqwest::Client,
}

impl NavitimeClient {
    #[must_use]
    pub fn new(config: NavitimeConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Station name autocomplete (prefix match).
    ///
    /// # Errors
    ///
    /// See [`Error`]; 403 maps to [`Error::Forbidden`] for this call only.
    pub async fn search_stations(&self, word: &SearchWord) -> Result<Vec<Station>, Error> {
        let mut url = self.config.transport_url.clone();
        url.query_pairs_mut()
            .append_pair("word", word.as_str())
            .append_pair("word_match", "prefix")
            .append_pair("datum", "wgs84")
            .append_pair("coord_unit", "degree");

        let response: TransportResponse = self.fetch(Operation::StationSearch, url).await?;
        Ok(shape::stations(response))
    }

    /// School (spot) search.
    ///
    /// # Errors
    ///
    /// See [`Error`].
    pub async fn search_schools(&self, word: &SearchWord) -> Result<Vec<School>, Error> {
        let mut url = self.config.spot_url.clone();
        url.query_pairs_mut()
            .append_pair("word", word.as_str())
            .append_pair("limit", SPOT_LIMIT)
            .append_pair("datum", "wgs84")
            .append_pair("coord_unit", "degree");

        let response: SpotResponse = self.fetch(Operation::SchoolSearch, url).await?;
        Ok(shape::schools(response))
    }

    /// Transit route summary departing now.
    ///
    /// # Errors
    ///
    /// See [`Error`]; also [`Error::NotFound`] and [`Error::Malformed`] from shaping.
    pub async fn route(&self, query: &RouteQuery) -> Result<RouteResult, Error> {
        let goal = format!("{},{}", query.goal.lat, query.goal.lon);
        let start_time = start_time(OffsetDateTime::now_utc());

        let mut url = self.config.route_url.clone();
        url.query_pairs_mut()
            .append_pair("start", query.start.as_str())
            .append_pair("goal", &goal)
            .append_pair("start_time", &start_time);

        let response: RouteResponse = self.fetch(Operation::RouteSearch, url).await?;
        shape::route(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, operation: Operation, url: Url) -> Result<T, Error> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            tracing::error!(%operation, "RAPIDAPI_KEY is not configured");
            Error::MissingApiKey
        })?;
        let host = url.host_str().unwrap_or_default().to_string();

        let exchange = async {
            let response = self
                .http
                .get(url)
                .header("X-RapidAPI-Key", api_key)
                .header("X-RapidAPI-Host", host)
                .send()
                .await?;

            let response = Self::ensure_success(response, operation).await?;
            response.json::<T>().await.map_err(Error::from)
        };

        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    %operation,
                    timeout = ?self.config.timeout,
                    "Upstream request timed out"
                );
                Err(Error::Timeout { operation })
            }
        }
    }

    /// Checks HTTP response status; returns the response on success or a typed error.
    async fn ensure_success(
        response: reqwest::Response,
        operation: Operation,
    ) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        tracing::error!(
            %operation,
            status = status.as_u16(),
            body = %detail,
            "Upstream returned error"
        );

        match status.as_u16() {
            429 => Err(Error::RateLimited { operation }),
            403 if operation == Operation::StationSearch => Err(Error::Forbidden { operation }),
            code => Err(Error::Upstream {
                operation,
                status: code,
                detail,
            }),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS`, the format the route API expects for `start_time`.
fn start_time(now: OffsetDateTime) -> String {
    now.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}
