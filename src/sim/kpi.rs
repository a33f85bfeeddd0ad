//! Post-hoc fleet metrics computed from simulation results.

use std::fmt;

use serde::Serialize;

use super::engine::{SimulationResults, UnitHistory};

/// Fleet-wide totals at one tick, taken over every unit including the hub.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FleetPoint {
    pub tick: usize,
    /// Sum of SOC over all units (percent points).
    pub total_soc: f64,
    /// `total_soc` divided by the number of units.
    pub average_soc: f64,
    /// Sum of held import flows (kW).
    pub total_power_in: f64,
    /// Sum of held export flows (kW).
    pub total_power_out: f64,
}

/// Per-unit statistics over a complete run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary {
    pub name: String,
    pub final_soc: f64,
    pub min_soc: f64,
    pub max_soc: f64,
    /// Lowest stored energy seen (kWh); negative when the battery overdrew.
    pub min_remaining_battery: f64,
    /// Energy into the battery, Σ charge rate × dt (kWh).
    pub energy_charged_kwh: f64,
    /// Energy out of the battery, Σ discharge rate × dt (kWh).
    pub energy_discharged_kwh: f64,
    /// Ticks with import enabled.
    pub import_ticks: usize,
    /// Ticks with export enabled.
    pub export_ticks: usize,
    /// Whether remaining energy ever dropped below zero.
    pub went_negative: bool,
}

impl UnitSummary {
    /// Summarises one unit's history.
    ///
    /// # Arguments
    ///
    /// * `history` - Records for the unit
    /// * `dt_hours` - Tick length in hours
    pub fn from_history(history: &UnitHistory, dt_hours: f64) -> Self {
        let records = &history.records;
        let mut min_soc = f64::INFINITY;
        let mut max_soc = f64::NEG_INFINITY;
        let mut min_remaining = f64::INFINITY;
        let mut charged = 0.0;
        let mut discharged = 0.0;
        let mut import_ticks = 0;
        let mut export_ticks = 0;

        for r in records {
            min_soc = min_soc.min(r.soc);
            max_soc = max_soc.max(r.soc);
            min_remaining = min_remaining.min(r.remaining_battery);
            charged += r.bat_charge * dt_hours;
            discharged += r.bat_discharge * dt_hours;
            import_ticks += usize::from(r.power_in_allowed);
            export_ticks += usize::from(r.power_out_allowed);
        }

        if records.is_empty() {
            min_soc = 0.0;
            max_soc = 0.0;
            min_remaining = 0.0;
        }

        Self {
            name: history.name.clone(),
            final_soc: records.last().map_or(0.0, |r| r.soc),
            min_soc,
            max_soc,
            min_remaining_battery: min_remaining,
            energy_charged_kwh: charged,
            energy_discharged_kwh: discharged,
            import_ticks,
            export_ticks,
            went_negative: min_remaining < 0.0,
        }
    }
}

/// Aggregate metrics derived from a complete simulation run.
///
/// Computed post-hoc from [`SimulationResults`] so that reported numbers
/// always agree with the recorded ticks.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Per-tick fleet totals.
    pub fleet: Vec<FleetPoint>,
    /// Per-unit summaries in run order.
    pub units: Vec<UnitSummary>,
    /// Average SOC at the last tick.
    pub final_average_soc: f64,
    /// Lowest average SOC over the run.
    pub min_average_soc: f64,
    /// Peak of the total held import flow (kW).
    pub peak_total_power_in: f64,
    /// Peak of the total held export flow (kW).
    pub peak_total_power_out: f64,
}

impl KpiReport {
    /// Computes all metrics from a finished run.
    pub fn from_results(results: &SimulationResults) -> Self {
        let histories: Vec<&UnitHistory> = results.iter().collect();
        let count = histories.len() as f64;

        let fleet: Vec<FleetPoint> = (0..results.tick_count())
            .map(|tick| {
                let mut point = FleetPoint {
                    tick,
                    total_soc: 0.0,
                    average_soc: 0.0,
                    total_power_in: 0.0,
                    total_power_out: 0.0,
                };
                for r in histories.iter().filter_map(|h| h.records.get(tick)) {
                    point.total_soc += r.soc;
                    point.total_power_in += r.power_in;
                    point.total_power_out += r.power_out;
                }
                point.average_soc = point.total_soc / count;
                point
            })
            .collect();

        let units = histories
            .iter()
            .map(|h| UnitSummary::from_history(h, results.dt_hours()))
            .collect();

        let min_average_soc = fleet
            .iter()
            .map(|p| p.average_soc)
            .reduce(f64::min)
            .unwrap_or(0.0);
        let peak_total_power_in = fleet.iter().map(|p| p.total_power_in).fold(0.0, f64::max);
        let peak_total_power_out = fleet.iter().map(|p| p.total_power_out).fold(0.0, f64::max);

        Self {
            final_average_soc: fleet.last().map_or(0.0, |p| p.average_soc),
            min_average_soc,
            peak_total_power_in,
            peak_total_power_out,
            fleet,
            units,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Final average SoC:     {:.1}%", self.final_average_soc)?;
        writeln!(f, "Min average SoC:       {:.1}%", self.min_average_soc)?;
        writeln!(f, "Peak total power in:   {:.2} kW", self.peak_total_power_in)?;
        writeln!(f, "Peak total power out:  {:.2} kW", self.peak_total_power_out)?;
        write!(
            f,
            "{:<10} {:>8} {:>8} {:>8} {:>10} {:>10} {:>6} {:>6}",
            "unit", "final%", "min%", "max%", "in kWh", "out kWh", "imp", "exp"
        )?;
        for u in &self.units {
            write!(
                f,
                "\n{:<10} {:>8.1} {:>8.1} {:>8.1} {:>10.2} {:>10.2} {:>6} {:>6}{}",
                u.name,
                u.final_soc,
                u.min_soc,
                u.max_soc,
                u.energy_charged_kwh,
                u.energy_discharged_kwh,
                u.import_ticks,
                u.export_ticks,
                if u.went_negative { "  (negative energy)" } else { "" }
            )?;
        }
        Ok(())
    }
}
