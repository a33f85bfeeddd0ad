//! Power unit: one mobile power system (or the hub) and its per-tick update.
//!
//! Each call to [`PowerUnit::advance`] runs four stages in a fixed order:
//! timer decay, environmental inputs, the export/import latches, and the
//! battery balance. A snapshot is appended to the unit's history afterwards.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::UnitConfig;
use crate::devices::{Battery, DeviceContext, LoadProfile, Profile, SolarProfile};
use crate::error::{Result, SimError};

use super::exchange::HubFlows;
use super::types::UnitRecord;

/// Interim calibration factor applied to every solar sample.
///
/// Not physically derived: the bell curve under-reports array output, so
/// samples are scaled by 4 until the curve itself is recalibrated.
pub const SOLAR_CORRECTION: f64 = 4.0;

/// Minimum number of ticks a latch stays committed once it fires.
pub const EXCHANGE_DWELL_TICKS: u32 = 6;

/// SOC thresholds gating exchange with the hub.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeThresholds {
    /// Import is enabled while SOC is strictly below this (percent).
    pub power_in_below: f64,
    /// Export is enabled while SOC is strictly above this (percent).
    pub power_out_above: f64,
}

/// Role of a unit in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// A member unit: imports only when low, exports only when over-full.
    Standard,
    /// The central hub: accepts charge readily and discharges down to 15 %.
    Hub,
}

impl UnitKind {
    /// Exchange thresholds for this kind.
    pub const fn thresholds(self) -> ExchangeThresholds {
        match self {
            Self::Standard => ExchangeThresholds {
                power_in_below: 40.0,
                power_out_above: 100.0,
            },
            Self::Hub => ExchangeThresholds {
                power_in_below: 100.0,
                power_out_above: 15.0,
            },
        }
    }

    /// Whether the driver may overwrite this unit's flows with fleet sums.
    pub const fn accepts_fleet_flows(self) -> bool {
        matches!(self, Self::Hub)
    }

    /// Lower-case label used in logs and API output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hub => "hub",
        }
    }
}

/// What a latch did during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchEvent {
    /// Eligible with an expired timer: flow committed and dwell re-armed.
    Fired,
    /// Eligible but still dwelling: previous state left untouched.
    Held,
    /// Not eligible while enabled: flag and flow cleared immediately.
    Cleared,
    /// Not eligible and already disabled.
    Idle,
}

/// One-shot hysteresis latch for a single exchange direction.
///
/// Once fired, the committed flow is held for [`EXCHANGE_DWELL_TICKS`]
/// updates. Losing eligibility clears it at once regardless of the timer;
/// the timer itself keeps counting down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeLatch {
    allowed: bool,
    flow_kw: f64,
    timer: u32,
}

impl ExchangeLatch {
    /// Whether exchange in this direction is enabled.
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Flow value currently held, whether or not it is enabled (kW).
    pub fn flow_kw(&self) -> f64 {
        self.flow_kw
    }

    /// Ticks left before the latch may fire again.
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Flow that actually reaches the battery: the held flow if enabled, else 0.
    pub fn effective_kw(&self) -> f64 {
        if self.allowed { self.flow_kw } else { 0.0 }
    }

    /// Counts the dwell timer down by one, stopping at zero.
    pub fn decay(&mut self) {
        self.timer = self.timer.saturating_sub(1);
    }

    /// Re-evaluates the latch.
    ///
    /// # Arguments
    ///
    /// * `eligible` - Whether the SOC condition for this direction holds
    /// * `flow_kw` - Flow to commit if the latch fires
    /// * `dwell` - Timer value to re-arm with on firing
    pub fn update(&mut self, eligible: bool, flow_kw: f64, dwell: u32) -> LatchEvent {
        if eligible {
            if self.timer == 0 {
                self.allowed = true;
                self.flow_kw = flow_kw;
                self.timer = dwell;
                LatchEvent::Fired
            } else {
                LatchEvent::Held
            }
        } else {
            let was_allowed = self.allowed;
            self.allowed = false;
            self.flow_kw = 0.0;
            if was_allowed {
                LatchEvent::Cleared
            } else {
                LatchEvent::Idle
            }
        }
    }

    /// Replaces the held flow without touching the flag or timer.
    fn overwrite_flow(&mut self, flow_kw: f64) {
        self.flow_kw = flow_kw;
    }
}

/// A battery-backed power unit with solar input, local load, and hub exchange.
#[derive(Debug, Clone)]
pub struct PowerUnit {
    name: String,
    kind: UnitKind,
    thresholds: ExchangeThresholds,
    max_power_kw: f64,
    battery: Battery,
    solar: SolarProfile,
    load: LoadProfile,
    dt_hours: f64,

    solar_input_kw: f64,
    local_load_kw: f64,
    bat_charge_kw: f64,
    bat_discharge_kw: f64,
    export: ExchangeLatch,
    import: ExchangeLatch,

    history: Vec<UnitRecord>,
}

impl PowerUnit {
    /// Creates a unit from its configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Unit parameters
    /// * `kind` - Standard member or hub
    /// * `dt_hours` - Tick length in hours
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a non-positive `max_power` or
    /// `max_battery`, an initial SOC outside 0..=100, or a load window whose
    /// end precedes its start.
    pub fn new(config: &UnitConfig, kind: UnitKind, dt_hours: f64) -> Result<Self> {
        if !(config.max_power.is_finite() && config.max_power > 0.0) {
            return Err(SimError::invalid("max_power", "must be > 0"));
        }
        let battery = Battery::new(config.max_battery, config.init_soc)?;
        let solar = SolarProfile::new(config.max_solar, config.peak_sun_hours);
        let load = LoadProfile::new(
            config.load_power,
            config.load_start,
            config.load_start.saturating_add(config.load_hours),
        )?;

        debug!(
            unit = %config.name,
            kind = kind.label(),
            daily_solar_kwh = SOLAR_CORRECTION * solar.daily_yield_kwh(),
            load_start = load.start_hour,
            load_end = load.end_hour,
            "unit created"
        );

        Ok(Self {
            name: config.name.clone(),
            kind,
            thresholds: kind.thresholds(),
            max_power_kw: config.max_power,
            battery,
            solar,
            load,
            dt_hours,
            solar_input_kw: 0.0,
            local_load_kw: 0.0,
            bat_charge_kw: 0.0,
            bat_discharge_kw: 0.0,
            export: ExchangeLatch::default(),
            import: ExchangeLatch::default(),
            history: Vec::new(),
        })
    }

    /// Unit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit kind.
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Thresholds selected at construction.
    pub fn thresholds(&self) -> ExchangeThresholds {
        self.thresholds
    }

    /// Current state of charge (percent).
    pub fn soc(&self) -> f64 {
        self.battery.soc_pct()
    }

    /// Current stored energy (kWh).
    pub fn remaining_battery(&self) -> f64 {
        self.battery.remaining_kwh()
    }

    /// Import flow value currently held (kW).
    pub fn power_in(&self) -> f64 {
        self.import.flow_kw()
    }

    /// Export flow value currently held (kW).
    pub fn power_out(&self) -> f64 {
        self.export.flow_kw()
    }

    /// Import latch state.
    pub fn import_latch(&self) -> &ExchangeLatch {
        &self.import
    }

    /// Export latch state.
    pub fn export_latch(&self) -> &ExchangeLatch {
        &self.export
    }

    /// Per-tick snapshots recorded so far.
    pub fn history(&self) -> &[UnitRecord] {
        &self.history
    }

    /// Consumes the unit, returning its history.
    pub fn into_history(self) -> Vec<UnitRecord> {
        self.history
    }

    /// Overwrites the held import/export flows with fleet totals.
    ///
    /// Only units whose kind [accepts fleet flows](UnitKind::accepts_fleet_flows)
    /// take the new values; for any other unit this is a no-op. Latch flags
    /// and timers are untouched, so the values persist into the next tick
    /// until a latch fires or clears.
    ///
    /// # Returns
    ///
    /// `true` if the flows were applied.
    pub fn apply_fleet_flows(&mut self, flows: HubFlows) -> bool {
        if !self.kind.accepts_fleet_flows() {
            debug!(unit = %self.name, "fleet flows ignored by non-hub unit");
            return false;
        }
        self.import.overwrite_flow(flows.power_in);
        self.export.overwrite_flow(flows.power_out);
        true
    }

    /// Advances the unit by one tick.
    ///
    /// # Arguments
    ///
    /// * `tick` - Tick index since the start of the run, also used as the
    ///   profile hour
    pub fn advance(&mut self, tick: usize) {
        let context = DeviceContext::new(tick);

        // 1. Timer decay
        self.export.decay();
        self.import.decay();

        // 2. Environmental inputs
        self.local_load_kw = self.load.power_kw(&context);
        self.solar_input_kw = SOLAR_CORRECTION * self.solar.power_kw(&context);

        // 3. Exchange latches, evaluated against the SOC left by the previous tick
        let soc = self.battery.soc_pct();
        let export_event = self.export.update(
            soc > self.thresholds.power_out_above,
            self.max_power_kw - self.local_load_kw,
            EXCHANGE_DWELL_TICKS,
        );
        let import_event = self.import.update(
            soc < self.thresholds.power_in_below,
            self.max_power_kw,
            EXCHANGE_DWELL_TICKS,
        );
        self.log_latch(tick, "export", export_event, &self.export);
        self.log_latch(tick, "import", import_event, &self.import);

        // 4. Battery balance
        self.bat_charge_kw = self.solar_input_kw + self.import.effective_kw();
        self.bat_discharge_kw = self.local_load_kw + self.export.effective_kw();
        self.battery
            .step(self.bat_charge_kw, self.bat_discharge_kw, self.dt_hours);

        let record = self.snapshot(tick);
        trace!(unit = %self.name, "{record}");
        self.history.push(record);
    }

    fn log_latch(&self, tick: usize, direction: &str, event: LatchEvent, latch: &ExchangeLatch) {
        match event {
            LatchEvent::Fired => debug!(
                unit = %self.name,
                tick,
                direction,
                flow_kw = latch.flow_kw(),
                "exchange latch fired"
            ),
            LatchEvent::Cleared => debug!(unit = %self.name, tick, direction, "exchange latch cleared"),
            LatchEvent::Held | LatchEvent::Idle => {}
        }
    }

    fn snapshot(&self, tick: usize) -> UnitRecord {
        UnitRecord {
            tick,
            time_hr: tick as f64 * self.dt_hours,
            name: self.name.clone(),
            soc: self.battery.soc_pct(),
            remaining_battery: self.battery.remaining_kwh(),
            bat_charge: self.bat_charge_kw,
            bat_discharge: self.bat_discharge_kw,
            solar_input: self.solar_input_kw,
            local_load: self.local_load_kw,
            power_in: self.import.flow_kw(),
            power_out: self.export.flow_kw(),
            power_in_allowed: self.import.allowed(),
            power_out_allowed: self.export.allowed(),
        }
    }
}
