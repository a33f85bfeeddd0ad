//! CSV export for per-unit simulation histories.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use snafu::ResultExt;

use crate::error::{CreateOutputDirSnafu, ExportSnafu, Result};
use crate::sim::engine::SimulationResults;
use crate::sim::types::UnitRecord;

/// Column header for per-unit CSV telemetry.
const HEADER: &str = "tick,time_hr,name,soc,remaining_battery,bat_charge,bat_discharge,\
                       solar_input,local_load,power_in,power_out,\
                       power_in_allowed,power_out_allowed";

/// Exports one unit's records to a CSV file at the given path.
///
/// # Arguments
///
/// * `records` - Per-tick records for one unit
/// * `path` - Output file path
///
/// # Errors
///
/// Returns [`SimError::Export`](crate::error::SimError::Export) if file
/// creation or writing fails.
pub fn export_csv(records: &[UnitRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(csv::Error::from)
        .context(ExportSnafu { path })?;
    write_csv(records, io::BufWriter::new(file)).context(ExportSnafu { path })
}

/// Writes records as CSV to any writer.
///
/// Writes a header row followed by one row per record. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv(records: &[UnitRecord], writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.1}", r.time_hr),
            r.name.clone(),
            format!("{:.4}", r.soc),
            format!("{:.4}", r.remaining_battery),
            format!("{:.4}", r.bat_charge),
            format!("{:.4}", r.bat_discharge),
            format!("{:.4}", r.solar_input),
            format!("{:.4}", r.local_load),
            format!("{:.4}", r.power_in),
            format!("{:.4}", r.power_out),
            r.power_in_allowed.to_string(),
            r.power_out_allowed.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one `<name>_results.csv` per unit into `dir`, creating it if needed.
///
/// # Returns
///
/// Paths of the written files, in run order.
///
/// # Errors
///
/// Returns [`SimError::CreateOutputDir`](crate::error::SimError::CreateOutputDir)
/// if the directory cannot be created, or `Export` for any failed file.
pub fn export_all(results: &SimulationResults, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context(CreateOutputDirSnafu { path: dir })?;

    results
        .iter()
        .map(|history| {
            let path = dir.join(format!("{}_results.csv", history.name));
            export_csv(&history.records, &path)?;
            tracing::debug!(unit = %history.name, path = %path.display(), "exported CSV");
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(tick: usize) -> UnitRecord {
        UnitRecord {
            tick,
            time_hr: tick as f64 * 0.5,
            name: "mps1".into(),
            soc: 26.2536,
            remaining_battery: 10.5014,
            bat_charge: 5.0028,
            bat_discharge: 0.0,
            solar_input: 0.0028,
            local_load: 0.0,
            power_in: 5.0,
            power_out: 0.0,
            power_in_allowed: true,
            power_out_allowed: false,
        }
    }

    #[test]
    fn header_lists_record_fields() {
        let mut buf = Vec::new();
        write_csv(&[make_record(0)], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(
            output.lines().next(),
            Some(
                "tick,time_hr,name,soc,remaining_battery,bat_charge,bat_discharge,\
                 solar_input,local_load,power_in,power_out,power_in_allowed,power_out_allowed"
            )
        );
    }

    #[test]
    fn row_count_matches_record_count() {
        let records: Vec<UnitRecord> = (0..48).map(make_record).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 48 data rows
        assert_eq!(output.lines().count(), 49);
    }

    #[test]
    fn rows_parse_back() {
        let records: Vec<UnitRecord> = (0..3).map(make_record).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 13);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(&row[2], "mps1");
            for i in 3..11 {
                assert!(row[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            assert_eq!(row[11].parse::<bool>().ok(), Some(true));
            assert_eq!(row[12].parse::<bool>().ok(), Some(false));
        }
        assert_eq!(&rows[2][1], "1.0");
        assert_eq!(&rows[0][3], "26.2536");
    }

    #[test]
    fn deterministic_output() {
        let records: Vec<UnitRecord> = (0..5).map(make_record).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&records, &mut buf1).unwrap();
        write_csv(&records, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }
}
