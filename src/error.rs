//! Error types for the MPS simulator.
//!
//! Every failure is detected before the first tick runs; the per-tick update
//! itself has no error path.

use std::path::PathBuf;

use snafu::Snafu;

/// Main error type for the library.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SimError {
    /// A configuration value violates a construction invariant.
    #[snafu(display("config error: {field}: {message}"))]
    InvalidConfig { field: String, message: String },

    /// Scenario file could not be read.
    #[snafu(display("cannot read scenario \"{}\": {source}", path.display()))]
    ReadScenario {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Scenario TOML is malformed or contains unknown fields.
    #[snafu(display("invalid scenario TOML: {source}"))]
    ParseScenario { source: toml::de::Error },

    /// Preset name is not one of the built-in presets.
    #[snafu(display("unknown preset \"{name}\", available: {available}"))]
    UnknownPreset { name: String, available: String },

    /// Output directory for CSV export could not be created.
    #[snafu(display("cannot create output directory \"{}\": {source}", path.display()))]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV export failed.
    #[snafu(display("failed to write CSV \"{}\": {source}", path.display()))]
    Export { path: PathBuf, source: csv::Error },
}

impl SimError {
    /// Shorthand for an [`SimError::InvalidConfig`] on `field`.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefixes the field path of a configuration error with `scope`.
    ///
    /// Other variants are returned unchanged.
    pub fn scoped(self, scope: &str) -> Self {
        match self {
            Self::InvalidConfig { field, message } => Self::InvalidConfig {
                field: format!("{scope}.{field}"),
                message,
            },
            other => other,
        }
    }

    /// Dotted field path for configuration errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = SimError> = std::result::Result<T, E>;
