//! Fleet-to-hub exchange totals.

use serde::Serialize;

use super::unit::PowerUnit;

/// Flows seen at the hub once member flows are summed.
///
/// Directions flip across the link: what members export is what the hub
/// imports, and what members import is what the hub exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HubFlows {
    /// Sum of member export flows (kW).
    pub power_in: f64,
    /// Sum of member import flows (kW).
    pub power_out: f64,
}

impl HubFlows {
    /// Sums `(power_in, power_out)` pairs reported by member units.
    ///
    /// # Examples
    ///
    /// ```
    /// use mps_sim::sim::exchange::HubFlows;
    ///
    /// let flows = HubFlows::from_member_flows([(0.0, 2.0), (1.5, 3.0)]);
    /// assert_eq!(flows.power_in, 5.0);
    /// assert_eq!(flows.power_out, 1.5);
    /// ```
    pub fn from_member_flows(flows: impl IntoIterator<Item = (f64, f64)>) -> Self {
        flows
            .into_iter()
            .fold(Self::default(), |acc, (member_in, member_out)| Self {
                power_in: acc.power_in + member_out,
                power_out: acc.power_out + member_in,
            })
    }

    /// Sums the flows currently held by `units`.
    pub fn from_units(units: &[PowerUnit]) -> Self {
        Self::from_member_flows(units.iter().map(|u| (u.power_in(), u.power_out())))
    }
}
