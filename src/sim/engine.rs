//! Simulation driver that advances the fleet and hub in lockstep.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::UnitConfig;
use crate::error::{Result, SimError};

use super::clock::Clock;
use super::exchange::HubFlows;
use super::types::{SimConfig, UnitRecord};
use super::unit::{PowerUnit, UnitKind};

/// Simulation driver owning every member unit and the hub.
///
/// Each tick advances the members in configuration order, then the hub,
/// then overwrites the hub's held flows with the member totals.
pub struct SimulationDriver {
    config: SimConfig,
    units: Vec<PowerUnit>,
    hub: PowerUnit,
}

impl SimulationDriver {
    /// Builds the fleet from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Tick count and tick length
    /// * `unit_configs` - Member units, in run order
    /// * `hub_config` - The hub unit
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the offending field
    /// (e.g. `units[1].max_battery`) if any unit fails construction, or if
    /// two units share a name.
    pub fn new(config: SimConfig, unit_configs: &[UnitConfig], hub_config: &UnitConfig) -> Result<Self> {
        let units = unit_configs
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PowerUnit::new(c, UnitKind::Standard, config.dt_hours)
                    .map_err(|e| e.scoped(&format!("units[{i}]")))
            })
            .collect::<Result<Vec<_>>>()?;
        let hub = PowerUnit::new(hub_config, UnitKind::Hub, config.dt_hours).map_err(|e| e.scoped("hub"))?;

        ensure_unique_names(&units, &hub)?;

        Ok(Self { config, units, hub })
    }

    /// Executes one tick.
    ///
    /// # Arguments
    ///
    /// * `tick` - Tick index
    pub fn step(&mut self, tick: usize) {
        for unit in &mut self.units {
            unit.advance(tick);
        }
        self.hub.advance(tick);

        let flows = HubFlows::from_units(&self.units);
        self.hub.apply_fleet_flows(flows);
    }

    /// Runs every tick and returns the collected histories.
    pub fn run(mut self) -> SimulationResults {
        info!(
            ticks = self.config.tick_count,
            units = self.units.len(),
            hub = %self.hub.name(),
            "simulation started"
        );

        let mut clock = Clock::new(self.config.tick_count, self.config.dt_hours);
        clock.run(|tick| self.step(tick.index));

        let results = self.into_results();
        for history in results.iter() {
            if let Some(min) = history.min_remaining_battery().filter(|m| *m < 0.0) {
                warn!(
                    unit = %history.name,
                    min_remaining_kwh = min,
                    "remaining battery went negative"
                );
            }
        }
        info!(ticks = results.tick_count(), "simulation finished");
        results
    }

    /// Member units.
    pub fn units(&self) -> &[PowerUnit] {
        &self.units
    }

    /// The hub unit.
    pub fn hub(&self) -> &PowerUnit {
        &self.hub
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn into_results(self) -> SimulationResults {
        let history = |unit: PowerUnit| UnitHistory {
            name: unit.name().to_string(),
            kind: unit.kind(),
            records: unit.into_history(),
        };
        SimulationResults {
            config: self.config,
            members: self.units.into_iter().map(history).collect(),
            hub: history(self.hub),
        }
    }
}

fn ensure_unique_names(units: &[PowerUnit], hub: &PowerUnit) -> Result<()> {
    let mut seen = HashSet::new();
    let named = units
        .iter()
        .enumerate()
        .map(|(i, u)| (format!("units[{i}].name"), u.name()))
        .chain(std::iter::once(("hub.name".to_string(), hub.name())));
    for (field, name) in named {
        if !seen.insert(name) {
            return Err(SimError::invalid(field, format!("duplicate unit name \"{name}\"")));
        }
    }
    Ok(())
}

/// Runs a complete simulation.
///
/// # Arguments
///
/// * `tick_count` - Number of half-hour ticks (must be > 0)
/// * `unit_configs` - Member units, in run order
/// * `hub_config` - The hub unit
///
/// # Errors
///
/// Returns [`SimError::InvalidConfig`] before any tick runs if the tick
/// count is zero or any unit is invalid.
///
/// # Examples
///
/// ```
/// use mps_sim::config::UnitConfig;
/// use mps_sim::sim::engine::run_simulation;
///
/// let units = vec![UnitConfig::named("mps1")];
/// let results = run_simulation(48, &units, &UnitConfig::hub_default()).unwrap();
/// assert_eq!(results.get("mps1").map(|r| r.len()), Some(48));
/// ```
pub fn run_simulation(
    tick_count: usize,
    unit_configs: &[UnitConfig],
    hub_config: &UnitConfig,
) -> Result<SimulationResults> {
    let config = SimConfig::new(tick_count)?;
    Ok(SimulationDriver::new(config, unit_configs, hub_config)?.run())
}

/// Ordered per-tick records for one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitHistory {
    pub name: String,
    pub kind: UnitKind,
    pub records: Vec<UnitRecord>,
}

impl UnitHistory {
    /// Lowest remaining battery energy over the run, if any ticks ran.
    pub fn min_remaining_battery(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.remaining_battery)
            .reduce(f64::min)
    }
}

/// Histories of a finished run: member units in configuration order, then the hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResults {
    config: SimConfig,
    members: Vec<UnitHistory>,
    hub: UnitHistory,
}

impl SimulationResults {
    /// Records for the named unit (member or hub).
    pub fn get(&self, name: &str) -> Option<&[UnitRecord]> {
        self.iter()
            .find(|h| h.name == name)
            .map(|h| h.records.as_slice())
    }

    /// All histories in run order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitHistory> {
        self.members.iter().chain(std::iter::once(&self.hub))
    }

    /// Member unit histories.
    pub fn members(&self) -> &[UnitHistory] {
        &self.members
    }

    /// Hub history.
    pub fn hub(&self) -> &UnitHistory {
        &self.hub
    }

    /// Unit names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|h| h.name.as_str()).collect()
    }

    /// Number of ticks simulated.
    pub fn tick_count(&self) -> usize {
        self.config.tick_count
    }

    /// Tick length in hours.
    pub fn dt_hours(&self) -> f64 {
        self.config.dt_hours
    }
}
