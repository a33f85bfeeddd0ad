//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use snafu::ResultExt;

use crate::error::{ParseScenarioSnafu, ReadScenarioSnafu, Result, SimError};
use crate::sim::engine::{SimulationResults, run_simulation};

/// Default start hour of a unit's load window.
pub const DEFAULT_LOAD_START: u32 = 6;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length.
    pub simulation: SimulationConfig,
    /// The hub unit. Fields left out of a `[hub]` table take hub defaults.
    #[serde(deserialize_with = "deserialize_hub")]
    pub hub: UnitConfig,
    /// Member units, in run order.
    pub units: Vec<UnitConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Simulation timing parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of half-hour ticks to run (must be > 0).
    pub tick_count: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { tick_count: 48 }
    }
}

/// Parameters of one power unit. The hub uses the same shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitConfig {
    /// Unique unit name.
    pub name: String,
    /// Exchange power limit (kW, > 0).
    pub max_power: f64,
    /// Battery capacity (kWh, > 0).
    pub max_battery: f64,
    /// Solar array peak capacity (kW, >= 0).
    pub max_solar: f64,
    /// Peak sun hours scaling the solar curve.
    pub peak_sun_hours: u32,
    /// Initial state of charge (percent, 0 to 100).
    pub init_soc: f64,
    /// Load drawn during the on-window (kW, >= 0).
    pub load_power: f64,
    /// Length of the load on-window (hours, 0 to 24).
    pub load_hours: u32,
    /// First hour of the load on-window.
    pub load_start: u32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            name: "mps".to_string(),
            max_power: 5.0,
            max_battery: 40.0,
            max_solar: 4.0,
            peak_sun_hours: 4,
            init_soc: 20.0,
            load_power: 8.0,
            load_hours: 10,
            load_start: DEFAULT_LOAD_START,
        }
    }
}

impl UnitConfig {
    /// Standard unit defaults under the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Hub defaults: large battery, half charged, no solar or load.
    pub fn hub_default() -> Self {
        Self {
            name: "hub".to_string(),
            max_power: 50.0,
            max_battery: 200.0,
            max_solar: 0.0,
            peak_sun_hours: 0,
            init_soc: 50.0,
            load_power: 0.0,
            load_hours: 0,
            load_start: DEFAULT_LOAD_START,
        }
    }

    fn validate_into(&self, scope: &str, errors: &mut Vec<SimError>) {
        let mut fail = |field: &str, message: &str| {
            errors.push(SimError::invalid(format!("{scope}.{field}"), message));
        };

        if self.name.trim().is_empty() {
            fail("name", "must not be empty");
        }
        for (field, value) in [
            ("max_power", self.max_power),
            ("max_battery", self.max_battery),
            ("max_solar", self.max_solar),
            ("init_soc", self.init_soc),
            ("load_power", self.load_power),
        ] {
            if !value.is_finite() {
                fail(field, "must be a finite number");
            }
        }
        if self.max_power <= 0.0 {
            fail("max_power", "must be > 0");
        }
        if self.max_battery <= 0.0 {
            fail("max_battery", "must be > 0");
        }
        if self.max_solar < 0.0 {
            fail("max_solar", "must be >= 0");
        }
        if !(0.0..=100.0).contains(&self.init_soc) {
            fail("init_soc", "must be in [0, 100]");
        }
        if self.load_power < 0.0 {
            fail("load_power", "must be >= 0");
        }
        if self.load_hours > 24 {
            fail("load_hours", "must be <= 24");
        }
        if self.load_start > 24 {
            fail("load_start", "must be <= 24");
        }
    }
}

/// `[hub]` table fields, each optional so omitted ones fall back to hub defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HubOverrides {
    name: Option<String>,
    max_power: Option<f64>,
    max_battery: Option<f64>,
    max_solar: Option<f64>,
    peak_sun_hours: Option<u32>,
    init_soc: Option<f64>,
    load_power: Option<f64>,
    load_hours: Option<u32>,
    load_start: Option<u32>,
}

impl HubOverrides {
    fn apply(self, base: UnitConfig) -> UnitConfig {
        UnitConfig {
            name: self.name.unwrap_or(base.name),
            max_power: self.max_power.unwrap_or(base.max_power),
            max_battery: self.max_battery.unwrap_or(base.max_battery),
            max_solar: self.max_solar.unwrap_or(base.max_solar),
            peak_sun_hours: self.peak_sun_hours.unwrap_or(base.peak_sun_hours),
            init_soc: self.init_soc.unwrap_or(base.init_soc),
            load_power: self.load_power.unwrap_or(base.load_power),
            load_hours: self.load_hours.unwrap_or(base.load_hours),
            load_start: self.load_start.unwrap_or(base.load_start),
        }
    }
}

fn deserialize_hub<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UnitConfig, D::Error> {
    HubOverrides::deserialize(deserializer).map(|o| o.apply(UnitConfig::hub_default()))
}

impl ScenarioConfig {
    /// Returns the baseline scenario: four default units and the default hub.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            hub: UnitConfig::hub_default(),
            units: (1..=4).map(|i| UnitConfig::named(&format!("mps{i}"))).collect(),
        }
    }

    /// Returns the single-unit preset: one default unit feeding the default hub.
    pub fn single() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            hub: UnitConfig::hub_default(),
            units: vec![UnitConfig::named("mps1")],
        }
    }

    /// Returns the solar-hub preset: a hub with its own array and a mixed fleet.
    pub fn solar_hub() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            hub: UnitConfig {
                max_solar: 20.0,
                peak_sun_hours: 5,
                init_soc: 30.0,
                ..UnitConfig::hub_default()
            },
            units: vec![
                UnitConfig::named("mps1"),
                UnitConfig {
                    init_soc: 60.0,
                    load_power: 4.0,
                    load_hours: 12,
                    ..UnitConfig::named("mps2")
                },
                UnitConfig {
                    max_solar: 6.0,
                    peak_sun_hours: 5,
                    init_soc: 35.0,
                    load_power: 6.0,
                    load_hours: 8,
                    load_start: 8,
                    ..UnitConfig::named("mps3")
                },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "single", "solar_hub"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPreset`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "single" => Ok(Self::single()),
            "solar_hub" => Ok(Self::solar_hub()),
            _ => Err(SimError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context(ReadScenarioSnafu { path })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ParseScenario`] if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context(ParseScenarioSnafu)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<SimError> {
        let mut errors = Vec::new();

        if self.simulation.tick_count == 0 {
            errors.push(SimError::invalid("simulation.tick_count", "must be > 0"));
        }

        for (i, unit) in self.units.iter().enumerate() {
            unit.validate_into(&format!("units[{i}]"), &mut errors);
        }
        self.hub.validate_into("hub", &mut errors);

        let mut seen = HashSet::new();
        let names = self
            .units
            .iter()
            .enumerate()
            .map(|(i, u)| (format!("units[{i}].name"), u.name.as_str()))
            .chain(std::iter::once(("hub.name".to_string(), self.hub.name.as_str())));
        for (field, name) in names {
            if !seen.insert(name) {
                errors.push(SimError::invalid(field, format!("duplicate unit name \"{name}\"")));
            }
        }

        errors
    }

    /// Runs this scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if any unit fails construction.
    pub fn run(&self) -> Result<SimulationResults> {
        run_simulation(self.simulation.tick_count, &self.units, &self.hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(cfg.units.len(), 4);
        assert_eq!(cfg.simulation.tick_count, 48);
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown preset"));
        assert!(msg.contains("solar_hub"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).unwrap();
            let errors = cfg.validate();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn default_unit_matches_dashboard_defaults() {
        let u = UnitConfig::default();
        assert_eq!(u.max_power, 5.0);
        assert_eq!(u.max_battery, 40.0);
        assert_eq!(u.max_solar, 4.0);
        assert_eq!(u.peak_sun_hours, 4);
        assert_eq!(u.init_soc, 20.0);
        assert_eq!(u.load_power, 8.0);
        assert_eq!(u.load_hours, 10);
        assert_eq!(u.load_start, 6);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
tick_count = 96

[hub]
max_battery = 300.0

[[units]]
name = "alpha"
max_power = 6.0
max_battery = 30.0
max_solar = 5.0
peak_sun_hours = 5
init_soc = 35.0
load_power = 3.0
load_hours = 6
load_start = 9

[[units]]
name = "beta"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.simulation.tick_count, 96);
        assert_eq!(cfg.units.len(), 2);
        assert_eq!(cfg.units[0].load_start, 9);
        // Omitted member fields take standard defaults.
        assert_eq!(cfg.units[1].max_battery, 40.0);
        // Omitted hub fields take hub defaults.
        assert_eq!(cfg.hub.max_battery, 300.0);
        assert_eq!(cfg.hub.max_power, 50.0);
        assert_eq!(cfg.hub.name, "hub");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\ntick_count = 10\n").unwrap();
        assert_eq!(cfg.simulation.tick_count, 10);
        assert_eq!(cfg.units, ScenarioConfig::baseline().units);
        assert_eq!(cfg.hub, UnitConfig::hub_default());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = "[simulation]\ntick_count = 24\nbogus_field = true\n";
        let err = ScenarioConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, SimError::ParseScenario { .. }));

        let toml = "[hub]\nmax_bat = 1.0\n";
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScenarioConfig::from_toml_file(Path::new("/nonexistent/scenario.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scenario.toml"));
    }

    #[test]
    fn validation_catches_zero_ticks() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.tick_count = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field() == Some("simulation.tick_count")));
    }

    #[test]
    fn validation_reports_every_bad_field() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.units[2].max_battery = 0.0;
        cfg.units[1].init_soc = 120.0;
        cfg.hub.max_power = -5.0;
        cfg.units[0].load_hours = 30;
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().filter_map(SimError::field).collect();
        assert!(fields.contains(&"units[2].max_battery"));
        assert!(fields.contains(&"units[1].init_soc"));
        assert!(fields.contains(&"hub.max_power"));
        assert!(fields.contains(&"units[0].load_hours"));
    }

    #[test]
    fn validation_catches_non_finite_values() {
        let mut cfg = ScenarioConfig::single();
        cfg.units[0].max_solar = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field() == Some("units[0].max_solar")));
    }

    #[test]
    fn validation_catches_duplicate_names() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.units[3].name = "mps1".into();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field() == Some("units[3].name")));
    }

    #[test]
    fn validation_catches_empty_name() {
        let mut cfg = ScenarioConfig::single();
        cfg.hub.name = " ".into();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field() == Some("hub.name")));
    }

    #[test]
    fn hub_only_scenario_is_valid() {
        let cfg = ScenarioConfig::from_toml_str("units = []\n").unwrap();
        assert!(cfg.units.is_empty());
        assert!(cfg.validate().is_empty());
        let results = cfg.run().unwrap();
        assert_eq!(results.names(), vec!["hub"]);
    }

    #[test]
    fn solar_hub_has_hub_array() {
        let cfg = ScenarioConfig::solar_hub();
        assert!(cfg.hub.max_solar > 0.0);
        assert_eq!(cfg.units.len(), 3);
    }
}
