//! MPS simulator entry point: CLI wiring and config-driven run.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mps_sim::config::ScenarioConfig;
use mps_sim::io::export::export_all;
use mps_sim::sim::kpi::KpiReport;

use cli::Cli;

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(cli: &Cli) -> Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then the baseline default
    let mut scenario = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(ticks) = cli.ticks {
        scenario.simulation.tick_count = ticks;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let scenario = load_scenario(&cli)?;
    let results = scenario.run().context("running simulation")?;
    let kpi = KpiReport::from_results(&results);

    if !cli.quiet {
        for tick in 0..results.tick_count() {
            for history in results.iter() {
                if let Some(r) = history.records.get(tick) {
                    println!("{r}");
                }
            }
        }
        println!();
    }
    println!("{kpi}");

    if let Some(dir) = &cli.telemetry_out {
        let written = export_all(&results, dir)?;
        eprintln!("Telemetry written to {} ({} files)", dir.display(), written.len());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(mps_sim::api::AppState { results, kpi });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
        rt.block_on(mps_sim::api::serve(state, addr))
            .with_context(|| format!("serving API on {addr}"))?;
    }

    Ok(())
}
