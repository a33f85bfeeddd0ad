//! REST API over a finished simulation run.
//!
//! Provides two GET endpoints:
//! - `/state`: run length, per-unit final state, and the KPI report
//! - `/units/{name}/telemetry`: one unit's records with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::engine::SimulationResults;
use crate::sim::kpi::KpiReport;

pub use types::{ErrorResponse, StateResponse, TelemetryQuery, UnitState};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`; all data is read-only so no locks are taken.
pub struct AppState {
    /// Histories of the finished run.
    pub results: SimulationResults,
    /// Fleet metrics derived from `results`.
    pub kpi: KpiReport,
}

impl AppState {
    /// Wraps finished results, computing their KPI report.
    pub fn new(results: SimulationResults) -> Self {
        let kpi = KpiReport::from_results(&results);
        Self { results, kpi }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/units/{name}/telemetry", get(handlers::get_unit_telemetry))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
