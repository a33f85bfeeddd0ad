//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use mps_sim::config::UnitConfig;
use mps_sim::sim::engine::{SimulationResults, run_simulation};

/// Number of ticks in one simulated day.
pub const DAY_TICKS: usize = 48;

/// The reference unit: 5 kW, 40 kWh, 4 kW solar at 4 peak sun hours,
/// starting at 20 % with an 8 kW load for 10 hours from hour 6.
pub fn reference_unit() -> UnitConfig {
    UnitConfig::named("mps1")
}

/// Default hub (50 kW, 200 kWh, 50 %, no solar or load).
pub fn default_hub() -> UnitConfig {
    UnitConfig::hub_default()
}

/// Runs the reference unit with the default hub for one day.
pub fn run_reference_day() -> SimulationResults {
    run_simulation(DAY_TICKS, &[reference_unit()], &default_hub())
        .expect("reference scenario should be valid")
}

/// Asserts `actual` is within `tol` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual}"
    );
}
