//! Shared fit-pipeline logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> redshift mapping -> grid build -> sweep -> best fit
//!
//! The CLI layer then focuses on presentation (printing and file outputs).

use chrono::Local;

use crate::data::observed_hz;
use crate::domain::{
    BestFit, ChiSquareSurface, FieldCurve, FitConfig, FitFile, FitOptions, HubblePoint,
};
use crate::error::AppError;
use crate::fit::{FitInputs, fit_grid, step_range};
use crate::io::ingest::load_field_curve;
use crate::models::RedshiftMap;
use crate::report::reduced_dof;

/// All computed outputs of a single `ripfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub curve: FieldCurve,
    /// Redshift at each curve point (same order as the time axis).
    pub z_sim: Vec<f64>,
    pub observed: Vec<HubblePoint>,
    pub surface: ChiSquareSurface,
    pub best: BestFit,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    // 1) Average the simulation runs.
    let curve = load_field_curve(&config.data_dir)?;

    // 2) Reinterpret the time axis as redshift.
    let map = RedshiftMap::new(&config.cosmology, config.z_min, config.z_max, config.z_samples)?;
    let z_sim = map.redshift_axis(&curve.time_myr)?;

    // 3) Build the candidate grids.
    let omega_grid = step_range(config.omega_min, config.omega_max, config.omega_step)?;
    let w_grid = step_range(config.w_min, config.w_max, config.w_step)?;

    // 4) Sweep.
    let observed = observed_hz();
    let inputs = FitInputs {
        field: &curve.values,
        z_sim: &z_sim,
        observed: &observed,
        omega_grid: &omega_grid,
        w_grid: &w_grid,
        cosmology: &config.cosmology,
    };
    let opts = FitOptions {
        v0_floor: config.v0_floor,
        extrapolation: config.extrapolation,
    };
    let surface = fit_grid(&inputs, &opts)?;
    let best = surface.best_fit();

    Ok(RunOutput {
        curve,
        z_sim,
        observed,
        surface,
        best,
    })
}

/// Assemble the portable JSON record of a finished run.
pub fn fit_file(config: &FitConfig, run: &RunOutput) -> FitFile {
    FitFile {
        tool: "ripfit".to_string(),
        generated: Local::now().to_rfc3339(),
        cosmology: config.cosmology,
        extrapolation: config.extrapolation,
        runs_averaged: run.curve.runs,
        n_obs: run.observed.len(),
        w_grid: run.surface.w.clone(),
        omega_grid: run.surface.omega.clone(),
        best: run.best,
        reduced_chi2: run.best.chi2 / reduced_dof(run.observed.len()) as f64,
    }
}
