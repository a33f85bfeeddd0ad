//! Common types and traits for unit input profiles.

/// Number of hour slots in one profile day.
pub const HOURS_PER_DAY: usize = 24;

/// Contextual information passed to profiles when sampling them.
///
/// # Fields
/// * `timestep` - Tick index since the start of the run, used directly as the
///   profile hour (profiles wrap it onto a 24-slot day)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceContext {
    pub timestep: usize,
}

impl DeviceContext {
    /// Creates a new DeviceContext for the given timestep.
    pub fn new(timestep: usize) -> Self {
        Self { timestep }
    }

    /// Profile slot for this timestep: `timestep mod 24`.
    pub fn hour_of_day(&self) -> usize {
        self.timestep % HOURS_PER_DAY
    }
}

/// Trait defining a time-of-day power profile feeding a unit.
///
/// Profiles are pure: sampling never mutates them, and the same context
/// always yields the same value.
pub trait Profile {
    /// Returns the power value at the specified time step.
    ///
    /// # Arguments
    ///
    /// * `context` - Sampling context carrying the current timestep
    ///
    /// # Returns
    ///
    /// Power in kilowatts (kW), always non-negative
    fn power_kw(&self, context: &DeviceContext) -> f64;
}

/// Normal probability density at `x` for the given mean and standard deviation.
///
/// # Arguments
///
/// * `x` - Sample point
/// * `mean` - Distribution mean
/// * `std_dev` - Standard deviation (must be > 0)
pub fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * std::f64::consts::PI).sqrt())
}
