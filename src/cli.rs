//! Command-line arguments for the `mps-sim` binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mps-sim", about = "Mobile power system fleet energy simulator")]
pub struct Cli {
    /// Load scenario from a TOML config file.
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, single, solar_hub).
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the number of half-hour ticks.
    #[arg(long)]
    pub ticks: Option<usize>,

    /// Write one `<unit>_results.csv` per unit into this directory.
    #[arg(long, value_name = "DIR")]
    pub telemetry_out: Option<PathBuf>,

    /// Print only the KPI report, not per-tick records.
    #[arg(long, short)]
    pub quiet: bool,

    /// Start REST API server after the simulation.
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
