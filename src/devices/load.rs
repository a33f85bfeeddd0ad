use crate::devices::types::{DeviceContext, Profile};
use crate::error::{Result, SimError};

/// A local load that draws a constant power inside a daily on-window.
///
/// The window is half-open, `[start_hour, end_hour)`, on the 24-slot profile
/// day. Windows crossing midnight are not supported: `end_hour` must not be
/// before `start_hour`, and an `end_hour` past 24 simply runs to the end of
/// the day.
///
/// # Examples
///
/// ```
/// use mps_sim::devices::{DeviceContext, LoadProfile, Profile};
///
/// let load = LoadProfile::new(8.0, 6, 16).unwrap();
/// assert_eq!(load.power_kw(&DeviceContext::new(5)), 0.0);
/// assert_eq!(load.power_kw(&DeviceContext::new(6)), 8.0);
/// assert_eq!(load.power_kw(&DeviceContext::new(16)), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LoadProfile {
    /// Demand while the window is on, in kilowatts.
    pub load_kw: f64,

    /// First profile hour of the on-window (inclusive).
    pub start_hour: u32,

    /// Profile hour ending the on-window (exclusive).
    pub end_hour: u32,
}

impl LoadProfile {
    /// Creates a new load profile.
    ///
    /// # Arguments
    ///
    /// * `load_kw` - Demand in kW while on (negative values are clamped to 0)
    /// * `start_hour` - Window start (inclusive)
    /// * `end_hour` - Window end (exclusive)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `end_hour < start_hour`.
    pub fn new(load_kw: f64, start_hour: u32, end_hour: u32) -> Result<Self> {
        if end_hour < start_hour {
            return Err(SimError::invalid(
                "load_window",
                format!("end hour {end_hour} is before start hour {start_hour}"),
            ));
        }
        Ok(Self {
            load_kw: load_kw.max(0.0),
            start_hour,
            end_hour,
        })
    }

    /// Returns `true` when the profile hour falls inside the on-window.
    pub fn is_on(&self, context: &DeviceContext) -> bool {
        let h = context.hour_of_day() as u64;
        u64::from(self.start_hour) <= h && h < u64::from(self.end_hour)
    }
}

impl Profile for LoadProfile {
    fn power_kw(&self, context: &DeviceContext) -> f64 {
        if self.is_on(context) { self.load_kw } else { 0.0 }
    }
}
