/// Simulation clock for tick management.
pub mod clock;
pub mod engine;
/// Hub aggregation of member unit flows.
pub mod exchange;
pub mod kpi;
pub mod types;
/// Power unit state machine and exchange latches.
pub mod unit;
