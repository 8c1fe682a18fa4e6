use super::Operation;
use super::types::{RouteResponse, SpotResponse, TransportResponse};
use crate::error::Error;
use crate::types::{RouteResult, School, Station, StationId};

#[must_use]
pub fn stations(response: TransportResponse) -> Vec<Station> {
    response
        .items
        .into_iter()
        .map(|node| Station {
            id: StationId(node.id),
            name: node.name,
            ruby: node.ruby,
            coord: node.coord,
            address_name: node.address_name,
        })
        .collect()
}

#[must_use]
pub fn schools(response: SpotResponse) -> Vec<School> {
    response
        .items
        .into_iter()
        .map(|spot| School {
            code: spot.code,
            name: spot.name,
            address: spot.address_name,
            coord: spot.coord,
            phone: spot.phone,
            categories: spot.categories,
        })
        .collect()
}

/// Summary of the first (best) route.
///
/// # Errors
///
/// [`Error::NotFound`] when there are no routes, [`Error::Malformed`] when the
/// first route lacks its `summary.move` block.
pub fn route(response: RouteResponse) -> Result<RouteResult, Error> {
    let first = response
        .items
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(Error::NotFound)?;

    let movement = first
        .summary
        .and_then(|s| s.movement)
        .ok_or(Error::Malformed {
            operation: Operation::RouteSearch,
            detail: "first route has no summary.move",
        })?;

    Ok(RouteResult {
        time: whole(movement.time) as u32,
        distance: whole(movement.distance) as u64,
        transit_count: whole(movement.transit_count) as u32,
    })
}

/// Nearest whole unit; missing, negative or non-finite values become 0.
/// The `as` casts above saturate at the integer bounds.
fn whole(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v.round().max(0.0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Coord;

    #[test]
    fn stations_keep_optional_fields() {
        let response: TransportResponse = serde_json::from_value(json!({
            "items": [
                {"id": "00001234", "name": "梅田", "coord": {"lat": 34.7, "lon": 135.5}},
                {"id": "00005678", "name": "天王寺", "ruby": "てんのうじ", "types": ["station"],
                 "address_name": "大阪府大阪市", "coord": {"lat": 34.64, "lon": 135.51}}
            ]
        }))
        .unwrap();

        let stations = stations(response);
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id.as_str(), "00001234");
        assert_eq!(stations[0].ruby, None);
        assert_eq!(stations[1].ruby.as_deref(), Some("てんのうじ"));
        assert_eq!(stations[1].address_name.as_deref(), Some("大阪府大阪市"));
        assert_eq!(stations[1].coord, Coord { lat: 34.64, lon: 135.51 });
    }

    #[test]
    fn missing_item_list_is_empty_not_error() {
        let response: TransportResponse = serde_json::from_value(json!({})).unwrap();
        assert!(stations(response).is_empty());

        let response: SpotResponse = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(schools(response).is_empty());
    }

    #[test]
    fn station_without_coord_fails_to_decode() {
        let result: Result<TransportResponse, _> =
            serde_json::from_value(json!({"items": [{"id": "1", "name": "x"}]}));
        assert!(result.is_err());
    }

    #[test]
    fn schools_map_address_and_categories() {
        let response: SpotResponse = serde_json::from_value(json!({
            "count": {"total": 1, "offset": 0, "limit": 10},
            "items": [{
                "code": "02001-1234", "name": "清風高等学校", "phone": "06-0000-0000",
                "address_name": "大阪府大阪市天王寺区", "coord": {"lat": 34.65, "lon": 135.52},
                "categories": [{"code": "0205001", "name": "高校", "level": "3"}]
            }]
        }))
        .unwrap();

        let schools = schools(response);
        assert_eq!(schools[0].address, "大阪府大阪市天王寺区");
        assert_eq!(schools[0].phone.as_deref(), Some("06-0000-0000"));
        assert_eq!(schools[0].categories.as_ref().unwrap()[0].name, "高校");
    }

    #[test]
    fn route_copies_first_summary() {
        let response: RouteResponse = serde_json::from_value(json!({
            "items": [
                {"summary": {"move": {"time": 35, "distance": 12034, "transit_count": 2,
                                      "fare": {"unit_0": 450}}}},
                {"summary": {"move": {"time": 50, "distance": 20000, "transit_count": 0}}}
            ],
            "unit": {"time": "minute", "distance": "metre"}
        }))
        .unwrap();

        assert_eq!(
            route(response).unwrap(),
            RouteResult { time: 35, distance: 12034, transit_count: 2 }
        );
    }

    #[test]
    fn route_defaults_missing_leaves_to_zero() {
        let response: RouteResponse =
            serde_json::from_value(json!({"items": [{"summary": {"move": {"time": 12}}}]})).unwrap();
        assert_eq!(
            route(response).unwrap(),
            RouteResult { time: 12, distance: 0, transit_count: 0 }
        );
    }

    #[test]
    fn route_accepts_float_leaves() {
        let response: RouteResponse = serde_json::from_value(json!({
            "items": [{"summary": {"move": {"time": 35.0, "distance": 12034.5, "transit_count": 2}}}]
        }))
        .unwrap();

        assert_eq!(
            route(response).unwrap(),
            RouteResult { time: 35, distance: 12035, transit_count: 2 }
        );
    }

    #[test]
    fn route_clamps_negative_leaves() {
        let response: RouteResponse = serde_json::from_value(json!({
            "items": [{"summary": {"move": {"time": -3, "distance": 800.4, "transit_count": null}}}]
        }))
        .unwrap();

        assert_eq!(
            route(response).unwrap(),
            RouteResult { time: 0, distance: 800, transit_count: 0 }
        );
    }

    #[test]
    fn route_empty_is_not_found() {
        let response: RouteResponse = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(matches!(route(response), Err(Error::NotFound)));

        let response: RouteResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(route(response), Err(Error::NotFound)));
    }

    #[test]
    fn route_without_move_is_malformed() {
        for body in [json!({"items": [{}]}), json!({"items": [{"summary": {}}]})] {
            let response: RouteResponse = serde_json::from_value(body).unwrap();
            assert!(matches!(route(response), Err(Error::Malformed { .. })));
        }
    }
}
