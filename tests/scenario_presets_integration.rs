use std::process::{Command, Output};

#[derive(Debug)]
struct Kpis {
    final_average_soc: f64,
    peak_total_power_in: f64,
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mps-sim"))
        .args(args)
        .output()
        .expect("mps-sim process should run")
}

fn run_ok(args: &[&str]) -> String {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

#[test]
fn scenario_files_run_via_cli_and_produce_distinct_dynamics() {
    let baseline = parse_kpis(&run_ok(&["--scenario", "scenarios/baseline.toml", "--quiet"]));
    let single = parse_kpis(&run_ok(&["--scenario", "scenarios/single_unit.toml", "--quiet"]));
    let solar_hub = parse_kpis(&run_ok(&["--scenario", "scenarios/solar_hub.toml", "--quiet"]));

    assert!(
        (baseline.peak_total_power_in - single.peak_total_power_in).abs() > 1.0,
        "expected baseline and single peak import to differ: baseline={:.3}, single={:.3}",
        baseline.peak_total_power_in,
        single.peak_total_power_in
    );
    assert!(
        (baseline.final_average_soc - solar_hub.final_average_soc).abs() > 0.1,
        "expected baseline and solar_hub final SoC to differ: baseline={:.3}, solar_hub={:.3}",
        baseline.final_average_soc,
        solar_hub.final_average_soc
    );
}

#[test]
fn scenario_files_match_presets() {
    for (file, preset) in [
        ("scenarios/baseline.toml", "baseline"),
        ("scenarios/single_unit.toml", "single"),
        ("scenarios/solar_hub.toml", "solar_hub"),
    ] {
        assert_eq!(
            run_ok(&["--scenario", file]),
            run_ok(&["--preset", preset]),
            "{file} should reproduce preset {preset}"
        );
    }
}

#[test]
fn default_run_prints_every_unit_each_tick() {
    let stdout = run_ok(&[]);
    let record_lines = stdout.lines().filter(|l| l.starts_with("t=")).count();
    // baseline: 4 units + hub over 48 ticks
    assert_eq!(record_lines, 5 * 48);
    assert!(stdout.contains("--- KPI Report ---"));
}

#[test]
fn ticks_override_changes_run_length() {
    let stdout = run_ok(&["--preset", "single", "--ticks", "10"]);
    let record_lines = stdout.lines().filter(|l| l.starts_with("t=")).count();
    assert_eq!(record_lines, 2 * 10);
}

#[test]
fn telemetry_out_writes_one_csv_per_unit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("telemetry");
    let out_str = out.to_str().expect("utf-8 path");
    run_ok(&["--preset", "single", "--quiet", "--telemetry-out", out_str]);

    for name in ["mps1", "hub"] {
        let csv = std::fs::read_to_string(out.join(format!("{name}_results.csv")))
            .unwrap_or_else(|e| panic!("missing CSV for {name}: {e}"));
        let mut lines = csv.lines();
        assert!(lines.next().is_some_and(|h| h.starts_with("tick,time_hr,name,soc")));
        assert_eq!(lines.count(), 48);
    }
}

#[test]
fn invalid_inputs_exit_non_zero() {
    assert!(!run_cli(&["--preset", "nope"]).status.success());
    assert!(!run_cli(&["--ticks", "0"]).status.success());
    assert!(!run_cli(&["--scenario", "scenarios/missing.toml"]).status.success());

    let dir = tempfile::tempdir().expect("temp dir");
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[[units]]\nname = \"a\"\nmax_battery = -1.0\n").expect("write scenario");
    let output = run_cli(&["--scenario", bad.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("units[0].max_battery"));
}

fn parse_kpis(stdout: &str) -> Kpis {
    Kpis {
        final_average_soc: parse_metric(stdout, "Final average SoC:", "%"),
        peak_total_power_in: parse_metric(stdout, "Peak total power in:", "kW"),
    }
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing KPI line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid KPI format for line `{line}`"));

    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from KPI line `{line}`"))
}
