//! Simulation-run ingest.
//!
//! This module turns a directory of `run_*.csv` simulator outputs into one
//! clean `FieldCurve` (the pointwise mean over runs).
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Fail fast** on malformed rows, naming the file and line
//! - **Cross-run consistency**: every run must share the first run's time axis
//! - **Separation of concerns**: no fitting or cosmology logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::FieldCurve;
use crate::error::AppError;

const TIME_COL: &str = "time_myr";
const FIELD_COL: &str = "rip_field";

/// Relative tolerance when matching time axes across runs.
const TIME_AXIS_TOL: f64 = 1e-6;

/// Discover `run_*.csv` files under `dir`, sorted by file name.
pub fn discover_runs(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AppError::input(format!(
            "Failed to read data directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("run_") && n.ends_with(".csv"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AppError::data(format!(
            "No run_*.csv files found in '{}'.",
            dir.display()
        )));
    }
    Ok(files)
}

/// Load every run in `dir` and average the field pointwise.
pub fn load_field_curve(dir: &Path) -> Result<FieldCurve, AppError> {
    let files = discover_runs(dir)?;

    let (time_myr, mut sum) = parse_run(&files[0])?;
    if time_myr.is_empty() {
        return Err(AppError::data(format!(
            "Run file '{}' has no data rows.",
            files[0].display()
        )));
    }

    for path in &files[1..] {
        let (t, v) = parse_run(path)?;
        if t.len() != time_myr.len() {
            return Err(AppError::data(format!(
                "Run file '{}' has {} rows but '{}' has {} (all runs must share one time axis).",
                path.display(),
                t.len(),
                files[0].display(),
                time_myr.len()
            )));
        }
        for (i, (&a, &b)) in time_myr.iter().zip(t.iter()).enumerate() {
            if (a - b).abs() > TIME_AXIS_TOL * a.abs().max(1.0) {
                return Err(AppError::data(format!(
                    "Run file '{}' row {}: time {} differs from '{}' time {}.",
                    path.display(),
                    i + 2,
                    b,
                    files[0].display(),
                    a
                )));
            }
        }
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }

    let n_runs = files.len() as f64;
    for acc in sum.iter_mut() {
        *acc /= n_runs;
    }

    Ok(FieldCurve {
        time_myr,
        values: sum,
        runs: files.len(),
    })
}

/// Parse one run file into (time, field) columns.
fn parse_run(path: &Path) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::input(format!(
                "Failed to read CSV headers from '{}': {e}",
                path.display()
            ))
        })?
        .clone();
    let header_map = build_header_map(&headers);

    let time_idx = *header_map.get(TIME_COL).ok_or_else(|| {
        AppError::input(format!(
            "Missing required column `{TIME_COL}` in '{}'.",
            path.display()
        ))
    })?;
    let field_idx = *header_map.get(FIELD_COL).ok_or_else(|| {
        AppError::input(format!(
            "Missing required column `{FIELD_COL}` in '{}'.",
            path.display()
        ))
    })?;

    let mut times = Vec::new();
    let mut values = Vec::new();
    let mut prev_time = f64::NEG_INFINITY;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!("CSV parse error in '{}' line {line}: {e}", path.display()))
        })?;

        let t = parse_field(&record, time_idx, TIME_COL, path, line)?;
        let v = parse_field(&record, field_idx, FIELD_COL, path, line)?;

        if t <= prev_time {
            return Err(AppError::data(format!(
                "Time axis not strictly ascending in '{}' line {line}: {t} after {prev_time}.",
                path.display()
            )));
        }
        prev_time = t;

        times.push(t);
        values.push(v);
    }

    Ok((times, values))
}

fn parse_field(
    record: &StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
    line: usize,
) -> Result<f64, AppError> {
    let raw = record.get(idx).map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        AppError::input(format!(
            "Missing `{name}` value in '{}' line {line}.",
            path.display()
        ))
    })?;

    let v: f64 = raw.parse().map_err(|_| {
        AppError::input(format!(
            "Invalid `{name}` value '{raw}' in '{}' line {line}.",
            path.display()
        ))
    })?;
    if !v.is_finite() {
        return Err(AppError::input(format!(
            "Non-finite `{name}` value '{raw}' in '{}' line {line}.",
            path.display()
        )));
    }
    Ok(v)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ripfit-ingest-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, body: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn averages_two_matching_runs() {
        let dir = scratch_dir("avg");
        write_file(&dir, "run_0.csv", "time_myr,rip_field\n0,1.0\n100,2.0\n");
        write_file(&dir, "run_1.csv", "time_myr,rip_field\n0,3.0\n100,6.0\n");

        let curve = load_field_curve(&dir).unwrap();
        assert_eq!(curve.runs, 2);
        assert_eq!(curve.time_myr, vec![0.0, 100.0]);
        assert!((curve.values[0] - 2.0).abs() < 1e-12);
        assert!((curve.values[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn ignores_non_run_files() {
        let dir = scratch_dir("extra");
        write_file(&dir, "run_0.csv", "time_myr,rip_field\n0,1.0\n");
        write_file(&dir, "notes.csv", "a,b\n1,2\n");
        write_file(&dir, "run_summary.txt", "hello");

        let files = discover_runs(&dir).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn missing_column_reports_file_and_column() {
        let dir = scratch_dir("badcol");
        write_file(&dir, "run_0.csv", "time_myr,strength\n0,1.0\n");

        let err = load_field_curve(&dir).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let msg = err.to_string();
        assert!(msg.contains("rip_field") && msg.contains("run_0.csv"), "{msg}");
    }

    #[test]
    fn malformed_value_reports_line() {
        let dir = scratch_dir("badval");
        write_file(&dir, "run_0.csv", "time_myr,rip_field\n0,1.0\n100,oops\n");

        let err = load_field_curve(&dir).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn mismatched_run_lengths_are_a_data_error() {
        let dir = scratch_dir("len");
        write_file(&dir, "run_0.csv", "time_myr,rip_field\n0,1.0\n100,2.0\n");
        write_file(&dir, "run_1.csv", "time_myr,rip_field\n0,3.0\n");

        let err = load_field_curve(&dir).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn empty_directory_is_a_data_error() {
        let dir = scratch_dir("empty");
        let err = load_field_curve(&dir).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bom_and_case_in_headers_are_tolerated() {
        let dir = scratch_dir("bom");
        write_file(&dir, "run_0.csv", "\u{feff}Time_Myr,RIP_FIELD\n0,1.0\n");

        let curve = load_field_curve(&dir).unwrap();
        assert_eq!(curve.len(), 1);
    }
}
