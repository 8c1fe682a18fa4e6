use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Minimum search word length, in characters.
pub const MIN_SEARCH_LENGTH: usize = 2;
/// Maximum search word length, in characters.
pub const MAX_SEARCH_LENGTH: usize = 50;

/// WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Departure station, as offered by station autocomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruby: Option<String>,
    pub coord: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_name: Option<String>,
}

/// Visit destination (school or other spot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub code: String,
    pub name: String,
    pub address: String,
    pub coord: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
    pub level: String,
}

/// Summary of the best transit route between a station and a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Minutes.
    pub time: u32,
    /// Meters.
    pub distance: u64,
    pub transit_count: u32,
}

/// `{items: [...]}` envelope used by the search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Upstream station identifier (opaque string such as `"00001234"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct StationId(pub String);

impl StationId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated autocomplete search word.
///
/// Holding a `SearchWord` proves the length is within
/// [`MIN_SEARCH_LENGTH`]..=[`MAX_SEARCH_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWord(String);

impl SearchWord {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate an optional raw query parameter; absence counts as too short.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the word is missing, too short or too long.
    pub fn from_param(word: Option<String>) -> Result<Self, Error> {
        Self::try_from(word.unwrap_or_default())
    }
}

impl TryFrom<String> for SearchWord {
    type Error = Error;

    fn try_from(word: String) -> Result<Self, Self::Error> {
        let len = word.chars().count();
        if len < MIN_SEARCH_LENGTH {
            return Err(Error::InvalidInput(format!(
                "search word must be at least {MIN_SEARCH_LENGTH} characters"
            )));
        }
        if len > MAX_SEARCH_LENGTH {
            return Err(Error::InvalidInput(format!(
                "search word must be at most {MAX_SEARCH_LENGTH} characters"
            )));
        }
        Ok(Self(word))
    }
}

impl std::fmt::Display for SearchWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw `/api/route` query parameters, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RouteParams {
    pub start: Option<String>,
    #[serde(rename = "goalLat")]
    pub goal_lat: Option<String>,
    #[serde(rename = "goalLon")]
    pub goal_lon: Option<String>,
}

/// Validated route request: departure station and destination coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub start: StationId,
    pub goal: Coord,
}

impl TryFrom<RouteParams> for RouteQuery {
    type Error = Error;

    fn try_from(params: RouteParams) -> Result<Self, Self::Error> {
        let start = params
            .start
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidInput("departure station id is required".into()))?;

        let (Some(lat), Some(lon)) = (
            params.goal_lat.filter(|s| !s.is_empty()),
            params.goal_lon.filter(|s| !s.is_empty()),
        ) else {
            return Err(Error::InvalidInput(
                "destination latitude and longitude are required".into(),
            ));
        };

        let invalid =
            || Error::InvalidInput("destination latitude/longitude is not a number".into());
        let lat = parse_finite(&lat).ok_or_else(invalid)?;
        let lon = parse_finite(&lon).ok_or_else(invalid)?;

        Ok(Self {
            start: StationId(start),
            goal: Coord { lat, lon },
        })
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
