use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::selector::SearchSelector;
use super::source::{PresetSource, ProxySource};
use super::{ProxyClient, inline_message};
use crate::error::Error;
use crate::types::{RouteResult, School, Station};

const SELECT_BOTH: &str = "select both a departure station and a destination";
const ROUTE_FAILURE: &str = "failed to search for a route";
const LOGOUT_FAILURE: &str = "logout failed";

/// A route result together with the endpoints it was searched for.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteView {
    pub station: Station,
    pub school: School,
    pub result: RouteResult,
}

impl RouteView {
    /// Distance in kilometres, one decimal place.
    #[must_use]
    pub fn distance_km(&self) -> String {
        format!("{:.1}", self.result.distance as f64 / 1000.0)
    }

    /// Google Maps transit directions between the two endpoints.
    #[must_use]
    pub fn maps_url(&self) -> String {
        let origin = self.station.coord;
        let destination = self.school.coord;
        format!(
            "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=transit",
            origin.lat, origin.lon, destination.lat, destination.lon
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerState {
    pub station: Option<Station>,
    pub school: Option<School>,
    pub view: Option<RouteView>,
    pub error: Option<String>,
    pub searching: bool,
}

/// Travel time search page: one departure station, one destination, one
/// route summary.
pub struct Planner {
    client: ProxyClient,
    state: Arc<Mutex<PlannerState>>,
}

impl Planner {
    #[must_use]
    pub fn new(client: ProxyClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(PlannerState::default())),
        }
    }

    /// Station autocomplete whose selection becomes the departure station.
    #[must_use]
    pub fn station_selector(&self) -> SearchSelector<ProxySource<Station>> {
        let state = Arc::clone(&self.state);
        SearchSelector::new(ProxySource::new(self.client.clone()))
            .on_select(move |station: &Station| lock(&state).station = Some(station.clone()))
    }

    /// School autocomplete whose selection becomes the destination.
    #[must_use]
    pub fn school_selector(&self) -> SearchSelector<ProxySource<School>> {
        let state = Arc::clone(&self.state);
        SearchSelector::new(ProxySource::new(self.client.clone()))
            .on_select(move |school: &School| lock(&state).school = Some(school.clone()))
    }

    /// Destination picker over a fixed catalog.
    #[must_use]
    pub fn destination_selector(&self, presets: PresetSource) -> SearchSelector<PresetSource> {
        let state = Arc::clone(&self.state);
        SearchSelector::new(presets)
            .on_select(move |school: &School| lock(&state).school = Some(school.clone()))
    }

    pub fn select_station(&self, station: Station) {
        lock(&self.state).station = Some(station);
    }

    pub fn select_school(&self, school: School) {
        lock(&self.state).school = Some(school);
    }

    #[must_use]
    pub fn snapshot(&self) -> PlannerState {
        lock(&self.state).clone()
    }

    /// Whether [`search`](Self::search) can run now.
    #[must_use]
    pub fn can_search(&self) -> bool {
        let state = lock(&self.state);
        state.station.is_some() && state.school.is_some() && !state.searching
    }

    /// Search a route between the selected station and destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either endpoint is missing, or the
    /// proxy's error. The inline message is stored in the state either way.
    pub async fn search(&self) -> Result<RouteView, Error> {
        let (station, school) = {
            let mut state = lock(&self.state);
            let (Some(station), Some(school)) = (state.station.clone(), state.school.clone()) else {
                state.error = Some(SELECT_BOTH.into());
                return Err(Error::InvalidInput(SELECT_BOTH.into()));
            };
            state.searching = true;
            state.error = None;
            state.view = None;
            (station, school)
        };

        let result = self.client.route(&station.id, school.coord).await;

        let mut state = lock(&self.state);
        state.searching = false;
        match result {
            Ok(result) => {
                let view = RouteView {
                    station,
                    school,
                    result,
                };
                state.view = Some(view.clone());
                Ok(view)
            }
            Err(e) => {
                tracing::warn!(error = %e, station = %station.id, "Route search failed");
                state.error = Some(inline_message(&e, ROUTE_FAILURE));
                Err(e)
            }
        }
    }

    /// End the session. The caller should then reload `/`, which the gate
    /// sends to the login page.
    ///
    /// # Errors
    ///
    /// Returns the proxy's error; the inline message is stored in the state.
    pub async fn logout(&self) -> Result<(), Error> {
        match self.client.logout().await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "Logout failed");
                lock(&self.state).error = Some(inline_message(&e, LOGOUT_FAILURE));
                Err(e)
            }
        }
    }
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::client::{Panel, preset_destinations};
    use crate::test_support::TestApp;
    use crate::types::{Coord, StationId};

    fn umeda() -> Station {
        Station {
            id: StationId("00001234".into()),
            name: "梅田".into(),
            ruby: None,
            coord: Coord { lat: 34.7055, lon: 135.4983 },
            address_name: None,
        }
    }

    fn college() -> School {
        preset_destinations().pop().unwrap()
    }

    fn route_body(time: u32, distance: u64, transit_count: u32) -> serde_json::Value {
        json!({ "items": [{ "summary": { "move": {
            "time": time, "distance": distance, "transit_count": transit_count
        } } }] })
    }

    #[test]
    fn route_view_formatting() {
        let view = RouteView {
            station: umeda(),
            school: college(),
            result: RouteResult { time: 25, distance: 8450, transit_count: 1 },
        };

        assert_eq!(view.distance_km(), "8.4");
        assert_eq!(
            view.maps_url(),
            "https://www.google.com/maps/dir/?api=1&origin=34.7055,135.4983\
             &destination=34.636468,135.509725&travelmode=transit"
        );
    }

    #[tokio::test]
    async fn search_requires_both_endpoints() {
        let app = TestApp::start(StatusCode::OK, route_body(25, 8400, 1)).await;
        let planner = Planner::new(app.client());
        planner.select_station(umeda());

        let err = planner.search().await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(planner.snapshot().error.as_deref(), Some(SELECT_BOTH));
        assert!(app.upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn search_stores_route_view() {
        let app = TestApp::start(StatusCode::OK, route_body(25, 8400, 1)).await;
        let planner = Planner::new(app.client());
        planner.select_station(umeda());
        planner.select_school(college());
        assert!(planner.can_search());

        let view = planner.search().await.unwrap();

        assert_eq!(view.result, RouteResult { time: 25, distance: 8400, transit_count: 1 });
        let state = planner.snapshot();
        assert_eq!(state.view, Some(view));
        assert!(state.error.is_none());
        assert!(!state.searching);
    }

    #[tokio::test]
    async fn failed_search_clears_previous_view() {
        let app = TestApp::start(StatusCode::OK, route_body(25, 8400, 1)).await;
        let planner = Planner::new(app.client());
        planner.select_station(umeda());
        planner.select_school(college());
        planner.search().await.unwrap();

        app.upstream.set_reply(StatusCode::OK, json!({ "items": [] }));
        planner.search().await.unwrap_err();

        let state = planner.snapshot();
        assert!(state.view.is_none());
        assert_eq!(state.error.as_deref(), Some("no route was found"));
    }

    #[tokio::test]
    async fn upstream_rate_limit_surfaces_message() {
        let app = TestApp::start(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
        let planner = Planner::new(app.client());
        planner.select_station(umeda());
        planner.select_school(college());

        planner.search().await.unwrap_err();

        assert_eq!(
            planner.snapshot().error.as_deref(),
            Some("API rate limit reached. Please wait a moment and try again")
        );
    }

    #[tokio::test]
    async fn station_selector_feeds_planner() {
        let app = TestApp::start(
            StatusCode::OK,
            json!({ "items": [{ "id": "00001234", "name": "梅田", "coord": { "lat": 34.7055, "lon": 135.4983 } }] }),
        )
        .await;
        let planner = Planner::new(app.client());
        let stations = planner.station_selector().with_debounce(Duration::from_millis(10));

        stations.input("梅田");
        let mut panel = stations.panel();
        for _ in 0..100 {
            if matches!(panel, Panel::Suggestions(_)) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            panel = stations.panel();
        }
        assert!(matches!(panel, Panel::Suggestions(_)), "unexpected panel: {panel:?}");

        stations.select(0).unwrap();
        assert_eq!(planner.snapshot().station, Some(umeda()));
    }

    #[tokio::test]
    async fn destination_selector_feeds_planner() {
        let app = TestApp::start(StatusCode::OK, json!({})).await;
        let planner = Planner::new(app.client());
        let destinations = planner
            .destination_selector(PresetSource::default())
            .with_debounce(Duration::from_millis(1));

        destinations.input("天王寺");
        for _ in 0..100 {
            if !destinations.snapshot().suggestions.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        destinations.select(0).unwrap();

        assert_eq!(
            planner.snapshot().school.map(|s| s.code),
            Some("tennoji-station".to_string())
        );
    }

    #[tokio::test]
    async fn logout_succeeds_without_verifying() {
        let app = TestApp::start(StatusCode::OK, json!({})).await;
        let planner = Planner::new(app.client());

        planner.logout().await.unwrap();

        assert!(planner.snapshot().error.is_none());
        assert_eq!(app.auth.hits.load(Ordering::SeqCst), 0);
    }
}
