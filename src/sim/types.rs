//! Core simulation types: run configuration and per-tick unit records.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, SimError};

/// Length of one tick in hours.
pub const INTERVAL_HOURS: f64 = 0.5;

/// Run-level simulation configuration.
///
/// # Examples
///
/// ```
/// use mps_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(48).unwrap();
/// assert_eq!(cfg.dt_hours, 0.5);
/// assert_eq!(cfg.total_hours(), 24.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Number of ticks to run.
    pub tick_count: usize,
    /// Duration of one tick in hours.
    pub dt_hours: f64,
}

impl SimConfig {
    /// Creates a new simulation configuration with half-hour ticks.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `tick_count` is zero.
    pub fn new(tick_count: usize) -> Result<Self> {
        if tick_count == 0 {
            return Err(SimError::invalid("simulation.tick_count", "must be > 0"));
        }
        Ok(Self {
            tick_count,
            dt_hours: INTERVAL_HOURS,
        })
    }

    /// Simulated duration in hours.
    pub fn total_hours(&self) -> f64 {
        self.tick_count as f64 * self.dt_hours
    }
}

/// Snapshot of one unit's observable state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRecord {
    /// Tick index.
    pub tick: usize,
    /// Simulated time in hours at the start of the tick.
    pub time_hr: f64,
    /// Unit name.
    pub name: String,
    /// State of charge after this tick (percent).
    pub soc: f64,
    /// Stored energy after this tick (kWh).
    pub remaining_battery: f64,
    /// Total power into the battery (kW).
    pub bat_charge: f64,
    /// Total power out of the battery (kW).
    pub bat_discharge: f64,
    /// Solar input after calibration (kW).
    pub solar_input: f64,
    /// Local load draw (kW).
    pub local_load: f64,
    /// Import flow value held by the unit (kW).
    pub power_in: f64,
    /// Export flow value held by the unit (kW).
    pub power_out: f64,
    /// Whether importing from the hub is enabled.
    pub power_in_allowed: bool,
    /// Whether exporting to the hub is enabled.
    pub power_out_allowed: bool,
}

impl fmt::Display for UnitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({:>5.1}h) {:<8} | SoC={:>6.1}% ({:>7.2} kWh) | \
             charge={:>6.2} discharge={:>6.2} | solar={:>5.2} load={:>5.2} | \
             in={:>6.2}{} out={:>6.2}{}",
            self.tick,
            self.time_hr,
            self.name,
            self.soc,
            self.remaining_battery,
            self.bat_charge,
            self.bat_discharge,
            self.solar_input,
            self.local_load,
            self.power_in,
            if self.power_in_allowed { "*" } else { " " },
            self.power_out,
            if self.power_out_allowed { "*" } else { " " },
        )
    }
}
