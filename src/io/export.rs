//! Result exports.
//!
//! Three artifacts come out of a fit:
//!
//! - the chi-square surface CSV (rows indexed by w, columns by Ω₀)
//! - a one-row best-fit CSV
//! - an optional fit JSON (metadata + best fit), the portable record of a run
//!
//! The surface CSV can also be read back (`read_surface_csv`) so the heat map
//! can be re-rendered without refitting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use nalgebra::DMatrix;

use crate::domain::{BestFit, ChiSquareSurface, FitFile};
use crate::error::AppError;

/// Write the chi-square surface.
///
/// Layout matches the historical analysis output: first header cell `w`,
/// remaining header cells the Ω₀ grid; each row starts with its w value.
pub fn write_surface_csv(path: &Path, surface: &ChiSquareSurface) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create surface CSV '{}': {e}",
            path.display()
        ))
    })?;

    let header = std::iter::once("w".to_string())
        .chain(surface.omega.iter().map(|o| o.to_string()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(file, "{header}")
        .map_err(|e| AppError::input(format!("Failed to write surface CSV header: {e}")))?;

    for (i, w) in surface.w.iter().enumerate() {
        let row = std::iter::once(w.to_string())
            .chain((0..surface.omega.len()).map(|j| surface.chi2[(i, j)].to_string()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{row}")
            .map_err(|e| AppError::input(format!("Failed to write surface CSV row: {e}")))?;
    }

    Ok(())
}

/// Read a surface CSV written by `write_surface_csv`.
pub fn read_surface_csv(path: &Path) -> Result<ChiSquareSurface, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open surface CSV '{}': {e}",
            path.display()
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read surface CSV headers: {e}")))?
        .clone();
    if headers.len() < 2 {
        return Err(AppError::input(format!(
            "Surface CSV '{}' needs a w column plus at least one Omega column.",
            path.display()
        )));
    }

    let omega: Vec<f64> = headers
        .iter()
        .skip(1)
        .map(|s| {
            s.parse::<f64>().map_err(|_| {
                AppError::input(format!("Invalid Omega header value '{s}' in '{}'.", path.display()))
            })
        })
        .collect::<Result<_, _>>()?;

    let mut w = Vec::new();
    let mut cells = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!("CSV parse error in '{}' line {line}: {e}", path.display()))
        })?;
        if record.len() != omega.len() + 1 {
            return Err(AppError::input(format!(
                "Surface CSV '{}' line {line}: expected {} cells, found {}.",
                path.display(),
                omega.len() + 1,
                record.len()
            )));
        }

        let mut fields = record.iter().map(|s| {
            s.parse::<f64>().map_err(|_| {
                AppError::input(format!(
                    "Invalid numeric value '{s}' in '{}' line {line}.",
                    path.display()
                ))
            })
        });
        // First cell is the row's w value.
        w.push(fields.next().unwrap_or_else(|| Ok(f64::NAN))?);
        for field in fields {
            cells.push(field?);
        }
    }

    if w.is_empty() {
        return Err(AppError::data(format!(
            "Surface CSV '{}' has no data rows.",
            path.display()
        )));
    }

    let chi2 = DMatrix::from_row_slice(w.len(), omega.len(), &cells);
    Ok(ChiSquareSurface { w, omega, chi2 })
}

/// Write the one-row best-fit CSV (`w,omega_rip_0,chi2`).
pub fn write_bestfit_csv(path: &Path, best: &BestFit) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create best-fit CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "w,omega_rip_0,chi2")
        .map_err(|e| AppError::input(format!("Failed to write best-fit CSV: {e}")))?;
    writeln!(file, "{},{},{}", best.w, best.omega0, best.chi2)
        .map_err(|e| AppError::input(format!("Failed to write best-fit CSV: {e}")))?;

    Ok(())
}

/// Write the fit JSON.
pub fn write_fit_json(path: &Path, fit: &FitFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create fit JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, fit)
        .map_err(|e| AppError::input(format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}
