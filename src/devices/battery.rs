use crate::error::{Result, SimError};

/// A unit's battery energy store.
///
/// `Battery` tracks remaining energy in kWh and the derived state of charge
/// in percent. Each step integrates `(charge - discharge) * dt` and clamps
/// the result at capacity. There is no lower clamp: a battery asked to
/// deliver more than it holds goes negative and so does its SOC.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Stored energy in kilowatt-hours, at most `capacity_kwh`.
    remaining_kwh: f64,

    /// State of charge in percent, recomputed from `remaining_kwh`.
    soc_pct: f64,
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `soc_pct` - Initial state of charge in percent (0 to 100)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if capacity is not positive or
    /// the initial SOC is outside 0..=100.
    pub fn new(capacity_kwh: f64, soc_pct: f64) -> Result<Self> {
        if !(capacity_kwh.is_finite() && capacity_kwh > 0.0) {
            return Err(SimError::invalid("max_battery", "must be > 0"));
        }
        if !(0.0..=100.0).contains(&soc_pct) {
            return Err(SimError::invalid("init_soc", "must be in [0, 100]"));
        }

        Ok(Self {
            capacity_kwh,
            remaining_kwh: capacity_kwh * (soc_pct / 100.0),
            soc_pct,
        })
    }

    /// Stored energy in kWh.
    pub fn remaining_kwh(&self) -> f64 {
        self.remaining_kwh
    }

    /// State of charge in percent.
    pub fn soc_pct(&self) -> f64 {
        self.soc_pct
    }

    /// Integrates one interval of charge and discharge power.
    ///
    /// # Arguments
    ///
    /// * `charge_kw` - Total power flowing into the battery (kW)
    /// * `discharge_kw` - Total power drawn from the battery (kW)
    /// * `dt_hours` - Interval length in hours
    pub fn step(&mut self, charge_kw: f64, discharge_kw: f64, dt_hours: f64) {
        self.remaining_kwh += (charge_kw - discharge_kw) * dt_hours;
        if self.remaining_kwh > self.capacity_kwh {
            self.remaining_kwh = self.capacity_kwh;
        }
        self.soc_pct = (self.remaining_kwh / self.capacity_kwh) * 100.0;
    }
}
