//! Mobile power system (MPS) fleet energy simulator.
//!
//! Battery-backed units with solar input and a daily load exchange power
//! with a central hub in half-hour ticks. See [`sim::engine::run_simulation`].

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
pub mod error;
/// Result export.
pub mod io;
/// Simulation driver, power units, and post-hoc metrics.
pub mod sim;
