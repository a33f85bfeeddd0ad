use crate::devices::types::{DeviceContext, HOURS_PER_DAY, Profile, gaussian_pdf};

/// Hour of peak irradiance on the profile curve.
const SOLAR_MEAN_HOUR: f64 = 12.0;

/// Width of the bell curve in hours.
const SOLAR_STD_DEV_HOURS: f64 = 3.0;

/// A solar array output profile sampled from a fixed bell-shaped curve.
///
/// `SolarProfile` precomputes 24 samples of
/// `kw_peak * peak_sun_hours * N(x; 12, 3)` on an evenly spaced grid from
/// hour 0 to hour 24 (inclusive at both ends), then serves them by
/// `timestep mod 24`. No normalisation to a daily energy total is applied.
///
/// # Examples
///
/// ```
/// use mps_sim::devices::{DeviceContext, Profile, SolarProfile};
///
/// let pv = SolarProfile::new(4.0, 4);
/// let noon = pv.power_kw(&DeviceContext::new(12));
/// assert_eq!(noon, pv.power_kw(&DeviceContext::new(36)));
/// ```
#[derive(Debug, Clone)]
pub struct SolarProfile {
    /// Rated array output in kilowatts.
    pub kw_peak: f64,

    /// Peak-sun-hours multiplier applied to the curve.
    pub peak_sun_hours: u32,

    /// Output in kW per profile hour.
    samples: [f64; HOURS_PER_DAY],
}

impl SolarProfile {
    /// Creates a new solar profile.
    ///
    /// # Arguments
    ///
    /// * `kw_peak` - Rated array output in kW (negative values are clamped to 0)
    /// * `peak_sun_hours` - Curve multiplier
    pub fn new(kw_peak: f64, peak_sun_hours: u32) -> Self {
        let kw_peak = kw_peak.max(0.0);
        let scale = kw_peak * f64::from(peak_sun_hours);
        let step = HOURS_PER_DAY as f64 / (HOURS_PER_DAY - 1) as f64;

        let mut samples = [0.0; HOURS_PER_DAY];
        for (i, sample) in samples.iter_mut().enumerate() {
            let x = i as f64 * step;
            *sample = scale * gaussian_pdf(x, SOLAR_MEAN_HOUR, SOLAR_STD_DEV_HOURS);
        }

        Self {
            kw_peak,
            peak_sun_hours,
            samples,
        }
    }

    /// Returns the precomputed sample table.
    pub fn samples(&self) -> &[f64; HOURS_PER_DAY] {
        &self.samples
    }

    /// Nominal daily yield in kWh: trapezoidal area under the sampled curve.
    ///
    /// Informational only; the simulation never enforces it.
    pub fn daily_yield_kwh(&self) -> f64 {
        let step = HOURS_PER_DAY as f64 / (HOURS_PER_DAY - 1) as f64;
        self.samples
            .windows(2)
            .map(|w| 0.5 * (w[0] + w[1]) * step)
            .sum()
    }
}

impl Profile for SolarProfile {
    /// Returns the array output for the timestep's profile hour.
    fn power_kw(&self, context: &DeviceContext) -> f64 {
        self.samples[context.hour_of_day()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(t: usize) -> DeviceContext {
        DeviceContext::new(t)
    }

    #[test]
    fn test_new_solar_profile() {
        let pv = SolarProfile::new(4.0, 4);
        assert_eq!(pv.kw_peak, 4.0);
        assert_eq!(pv.peak_sun_hours, 4);
        assert_eq!(pv.samples().len(), 24);
    }

    #[test]
    fn test_negative_kw_peak_clamped_to_zero() {
        let pv = SolarProfile::new(-1.0, 4);
        assert_eq!(pv.kw_peak, 0.0);
        assert!(pv.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_sun_hours_is_dark() {
        let pv = SolarProfile::new(4.0, 0);
        for t in 0..24 {
            assert_eq!(pv.power_kw(&ctx(t)), 0.0);
        }
    }

    #[test]
    fn test_known_sample_values() {
        // 4 kW * 4 h * pdf(x; 12, 3) on a 24-point grid over [0, 24]
        let pv = SolarProfile::new(4.0, 4);
        assert!((pv.power_kw(&ctx(0)) - 0.000_713).abs() < 1e-5);
        assert!((pv.power_kw(&ctx(6)) - 0.341_4).abs() < 1e-3);
        assert!((pv.power_kw(&ctx(11)) - 2.095_8).abs() < 1e-3);
        assert!((pv.power_kw(&ctx(12)) - 2.095_8).abs() < 1e-3);
    }

    #[test]
    fn test_curve_is_symmetric_around_midday() {
        let pv = SolarProfile::new(5.0, 3);
        for h in 0..12 {
            let a = pv.power_kw(&ctx(h));
            let b = pv.power_kw(&ctx(23 - h));
            assert!((a - b).abs() < 1e-12, "asymmetric at h={h}: {a} vs {b}");
        }
    }

    #[test]
    fn test_rises_until_midday() {
        let pv = SolarProfile::new(4.0, 4);
        for h in 1..12 {
            assert!(pv.power_kw(&ctx(h)) > pv.power_kw(&ctx(h - 1)));
        }
    }

    #[test]
    fn test_daily_yield_close_to_rated_energy() {
        // The bell curve integrates to ~1 over a day, so yield ~= kw_peak * psh.
        let pv = SolarProfile::new(4.0, 4);
        let yield_kwh = pv.daily_yield_kwh();
        assert!(yield_kwh > 15.0 && yield_kwh < 16.0, "yield={yield_kwh}");
    }
}
