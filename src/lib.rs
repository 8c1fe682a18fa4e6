#![doc = include_str!("../README.md")]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod server;
pub mod types;
pub mod upstream;
pub mod verify;

#[cfg(test)]
mod test_support;

// Re-exports for convenient access
pub use config::Config;
pub use error::Error;
pub use types::{
    Coord, RouteQuery, RouteResult, School, SearchWord, Station, StationId, MAX_SEARCH_LENGTH,
    MIN_SEARCH_LENGTH,
};
pub use upstream::{NavitimeClient, NavitimeConfig};
pub use verify::VerifyClient;
