//! API response and query types.
//!
//! Telemetry rows reuse [`UnitRecord`] so JSON field names match the CSV
//! export columns.

use serde::{Deserialize, Serialize};

use crate::sim::engine::UnitHistory;
use crate::sim::kpi::KpiReport;
use crate::sim::types::UnitRecord;
use crate::sim::unit::UnitKind;

/// Run overview: length, per-unit final state, and KPIs.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Number of ticks simulated.
    pub tick_count: usize,
    /// Tick length in hours.
    pub dt_hours: f64,
    /// Units in run order, hub last.
    pub units: Vec<UnitState>,
    /// Fleet metrics.
    pub kpi: KpiReport,
}

/// One unit's identity and its record at the final tick.
#[derive(Debug, Serialize)]
pub struct UnitState {
    pub name: String,
    pub kind: UnitKind,
    /// Record for the last tick, absent only for an empty history.
    pub latest: Option<UnitRecord>,
}

impl From<&UnitHistory> for UnitState {
    fn from(h: &UnitHistory) -> Self {
        Self {
            name: h.name.clone(),
            kind: h.kind,
            latest: h.records.last().cloned(),
        }
    }
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// Start tick (inclusive).
    pub from: Option<usize>,
    /// End tick (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
