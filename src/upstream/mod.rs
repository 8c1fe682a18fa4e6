//! NAVITIME (RapidAPI) client: station autocomplete, spot search and
//! transit route summaries.

pub mod client;
pub mod shape;
pub mod types;

pub use client::{NavitimeClient, NavitimeConfig};

/// The upstream call being made, used for logging and error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StationSearch,
    SchoolSearch,
    RouteSearch,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StationSearch => "station search",
            Self::SchoolSearch => "school search",
            Self::RouteSearch => "route search",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
