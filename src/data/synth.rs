//! Synthetic simulation runs.
//!
//! The fitter normally consumes `run_*.csv` files produced by the external
//! rip-field simulator. For demos and smoke testing we can generate a stand-in
//! dataset: a smooth field that grows toward a late-time plateau, with seeded
//! per-run Gaussian noise so averaging over runs is meaningful.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::AppError;

/// Controls for synthetic run generation.
#[derive(Debug, Clone, Copy)]
pub struct SynthOptions {
    /// Number of independent runs to write.
    pub runs: usize,
    /// Total simulated duration in Myr.
    pub duration_myr: f64,
    /// Output cadence in Myr.
    pub step_myr: f64,
    /// Base RNG seed; run `i` uses `seed + i`.
    pub seed: u64,
    /// Relative per-point noise (standard deviation).
    pub noise: f64,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            runs: 10,
            duration_myr: 13_800.0,
            step_myr: 100.0,
            seed: 42,
            noise: 0.05,
        }
    }
}

/// Late-time plateau of the noiseless template, in density-fraction units.
const FIELD_PLATEAU: f64 = 7.0e-4;

/// Noiseless field template: logistic growth toward the plateau.
fn field_template(t_myr: f64, duration_myr: f64) -> f64 {
    let mid = 0.55 * duration_myr;
    let tau = duration_myr / 8.0;
    FIELD_PLATEAU / (1.0 + (-(t_myr - mid) / tau).exp())
}

/// One synthetic run as (time_myr, rip_field) pairs. Deterministic for a
/// given (options, run index).
pub fn synthetic_curve(opts: &SynthOptions, run: usize) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(opts.seed.wrapping_add(run as u64));
    // A zero/invalid sigma just means "no pointwise noise".
    let noise = Normal::new(0.0, opts.noise.max(0.0)).ok();

    // Small per-run amplitude offset on top of pointwise noise, mimicking
    // run-to-run spread in the simulator.
    let amplitude = 1.0 + 0.02 * rng.gen_range(-1.0..1.0);

    let steps = (opts.duration_myr / opts.step_myr).floor() as usize;
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = opts.step_myr * i as f64;
        let base = amplitude * field_template(t, opts.duration_myr);
        let jitter = noise.as_ref().map_or(0.0, |n| n.sample(&mut rng));
        let v = (base * (1.0 + jitter)).max(0.0);
        out.push((t, v));
    }
    out
}

/// Write `run_0.csv` … `run_{n-1}.csv` under `dir`, creating it if needed.
///
/// The schema matches the simulator output: `time_myr,rip_field`.
pub fn write_synthetic_runs(dir: &Path, opts: &SynthOptions) -> Result<Vec<PathBuf>, AppError> {
    if opts.runs == 0 {
        return Err(AppError::input("Synthetic run count must be >= 1."));
    }
    if !(opts.duration_myr.is_finite() && opts.duration_myr > 0.0) {
        return Err(AppError::input(format!(
            "Invalid synthetic duration {} Myr.",
            opts.duration_myr
        )));
    }
    if !(opts.step_myr.is_finite() && opts.step_myr > 0.0 && opts.step_myr <= opts.duration_myr) {
        return Err(AppError::input(format!(
            "Invalid synthetic step {} Myr (must be > 0 and <= duration).",
            opts.step_myr
        )));
    }

    create_dir_all(dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create data directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut paths = Vec::with_capacity(opts.runs);
    for run in 0..opts.runs {
        let path = dir.join(format!("run_{run}.csv"));
        let mut file = File::create(&path).map_err(|e| {
            AppError::input(format!("Failed to create '{}': {e}", path.display()))
        })?;

        writeln!(file, "time_myr,rip_field")
            .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
        for (t, v) in synthetic_curve(opts, run) {
            writeln!(file, "{t},{v:.12e}").map_err(|e| {
                AppError::input(format!("Failed to write '{}': {e}", path.display()))
            })?;
        }
        paths.push(path);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_are_deterministic_per_seed_and_run() {
        let opts = SynthOptions::default();
        assert_eq!(synthetic_curve(&opts, 3), synthetic_curve(&opts, 3));
        assert_ne!(synthetic_curve(&opts, 0), synthetic_curve(&opts, 1));
    }

    #[test]
    fn curve_covers_the_requested_cadence() {
        let opts = SynthOptions {
            duration_myr: 1_000.0,
            step_myr: 100.0,
            ..SynthOptions::default()
        };
        let curve = synthetic_curve(&opts, 0);
        assert_eq!(curve.len(), 11);
        assert!((curve[0].0 - 0.0).abs() < 1e-12);
        assert!((curve[10].0 - 1_000.0).abs() < 1e-12);
    }

    #[test]
    fn field_is_non_negative_and_grows_on_average() {
        let opts = SynthOptions::default();
        let curve = synthetic_curve(&opts, 0);
        assert!(curve.iter().all(|&(_, v)| v >= 0.0));
        // Late-time mean should sit well above the early-time mean.
        let early: f64 = curve[..20].iter().map(|&(_, v)| v).sum::<f64>() / 20.0;
        let n = curve.len();
        let late: f64 = curve[n - 20..].iter().map(|&(_, v)| v).sum::<f64>() / 20.0;
        assert!(late > 10.0 * early.max(1e-18));
    }

    #[test]
    fn rejects_degenerate_options() {
        let dir = std::env::temp_dir().join("ripfit-synth-invalid");
        let bad = SynthOptions {
            runs: 0,
            ..SynthOptions::default()
        };
        assert!(write_synthetic_runs(&dir, &bad).is_err());

        let bad = SynthOptions {
            step_myr: 0.0,
            ..SynthOptions::default()
        };
        assert!(write_synthetic_runs(&dir, &bad).is_err());
    }
}
