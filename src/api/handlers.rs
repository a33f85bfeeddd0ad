//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, StateResponse, TelemetryQuery, UnitState};
use crate::sim::types::UnitRecord;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

/// Returns run length, per-unit final state, and the KPI report.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        tick_count: state.results.tick_count(),
        dt_hours: state.results.dt_hours(),
        units: state.results.iter().map(UnitState::from).collect(),
        kpi: state.kpi.clone(),
    })
}

/// Returns one unit's records, optionally filtered by tick range.
///
/// `GET /units/{name}/telemetry` → 200 + `Vec<UnitRecord>` JSON
/// `GET /units/{name}/telemetry?from=N&to=M` → filtered range (inclusive)
/// `from > to` → 400, unknown unit → 404, both with `ErrorResponse`
pub async fn get_unit_telemetry(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<TelemetryQuery>,
) -> Result<Json<Vec<UnitRecord>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let records = state
        .results
        .get(&name)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown unit \"{name}\"")))?;

    Ok(Json(
        records
            .iter()
            .filter(|r| r.tick >= from && r.tick <= to)
            .cloned()
            .collect(),
    ))
}
