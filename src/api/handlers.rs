use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use super::{ApiError, ApiState};
use crate::types::{Items, RouteParams, RouteQuery, RouteResult, School, SearchWord, Station};
use crate::upstream::Operation;

#[derive(Deserialize)]
pub(super) struct SearchParams {
    word: Option<String>,
}

pub(super) async fn stations(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Items<Station>>, ApiError> {
    let op = Operation::StationSearch;
    let word = SearchWord::from_param(params.word).map_err(|e| ApiError::new(op, e))?;

    let items = state
        .navitime
        .search_stations(&word)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(Json(Items { items }))
}

pub(super) async fn schools(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Items<School>>, ApiError> {
    let op = Operation::SchoolSearch;
    let word = SearchWord::from_param(params.word).map_err(|e| ApiError::new(op, e))?;

    let items = state
        .navitime
        .search_schools(&word)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    Ok(Json(Items { items }))
}

pub(super) async fn route(
    State(state): State<ApiState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<RouteResult>, ApiError> {
    let op = Operation::RouteSearch;
    let query = RouteQuery::try_from(params).map_err(|e| ApiError::new(op, e))?;

    let result = state
        .navitime
        .route(&query)
        .await
        .map_err(|e| ApiError::new(op, e))?;

    tracing::debug!(start = %query.start, time = result.time, "Route found");
    Ok(Json(result))
}
