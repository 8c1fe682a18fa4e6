//! Wire shapes of the NAVITIME responses. Only the fields the shaper reads
//! are modelled; everything else is ignored.

use serde::Deserialize;

use crate::types::{Category, Coord};

#[derive(Debug, Deserialize)]
pub struct TransportResponse {
    #[serde(default)]
    pub items: Vec<TransportNode>,
}

#[derive(Debug, Deserialize)]
pub struct TransportNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ruby: Option<String>,
    #[serde(default)]
    pub address_name: Option<String>,
    pub coord: Coord,
}

#[derive(Debug, Deserialize)]
pub struct SpotResponse {
    #[serde(default)]
    pub items: Vec<Spot>,
}

#[derive(Debug, Deserialize)]
pub struct Spot {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address_name: String,
    pub coord: Coord,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub items: Option<Vec<RouteItem>>,
}

#[derive(Debug, Deserialize)]
pub struct RouteItem {
    #[serde(default)]
    pub summary: Option<RouteSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    #[serde(default, rename = "move")]
    pub movement: Option<Movement>,
}

/// Route totals. Any JSON number is accepted; whole units are taken when
/// shaping.
#[derive(Debug, Deserialize)]
pub struct Movement {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub transit_count: Option<f64>,
}
