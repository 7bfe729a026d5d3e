//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the grid search
//! - exported to CSV/JSON
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Out-of-range policy for interpolating the simulated curve onto observed
/// redshifts.
///
/// The simulated redshift range does not necessarily cover every observed
/// point, so what happens beyond the tabulated range is an explicit choice
/// rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtrapolationPolicy {
    /// Hold the edge value (matches the behavior of the original analysis).
    Clamp,
    /// Fail with a numeric error when a query falls outside the range.
    Error,
    /// Extend the first/last segment linearly.
    Linear,
}

/// Fixed background cosmology.
///
/// `h0` is in km/s/Mpc; the density parameters are dimensionless fractions.
/// A flat universe is assumed for the age integral, i.e.
/// `omega_lambda = 1 - omega_m - omega_r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cosmology {
    pub h0: f64,
    pub omega_m: f64,
    pub omega_r: f64,
}

impl Cosmology {
    /// Planck 2018 values as used by the original analysis.
    pub fn planck18() -> Self {
        Self {
            h0: 67.66,
            omega_m: 0.30966,
            omega_r: 9.24e-5,
        }
    }

    /// Dark-energy fraction implied by flatness.
    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_m - self.omega_r
    }

    /// Check the parameters are usable before any numerics run.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(format!("Invalid H0={} (must be finite and > 0).", self.h0));
        }
        if !(self.omega_m.is_finite() && self.omega_m >= 0.0) {
            return Err(format!(
                "Invalid Omega_m={} (must be finite and >= 0).",
                self.omega_m
            ));
        }
        if !(self.omega_r.is_finite() && self.omega_r >= 0.0) {
            return Err(format!(
                "Invalid Omega_r={} (must be finite and >= 0).",
                self.omega_r
            ));
        }
        Ok(())
    }
}

/// One observed cosmic-chronometer measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubblePoint {
    /// Redshift.
    pub z: f64,
    /// Hubble rate in km/s/Mpc.
    pub h: f64,
    /// 1σ measurement uncertainty in km/s/Mpc.
    pub sigma: f64,
}

/// The pointwise mean field curve over all simulation runs.
#[derive(Debug, Clone)]
pub struct FieldCurve {
    /// Simulated time axis in millions of years (ascending).
    pub time_myr: Vec<f64>,
    /// Mean rip-field strength at each time step.
    pub values: Vec<f64>,
    /// Number of runs averaged into `values`.
    pub runs: usize,
}

impl FieldCurve {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The full 2-D chi-square surface over the (w, Ω₀) grid.
///
/// Rows are indexed by `w`, columns by `omega` — the same orientation as the
/// exported surface CSV.
#[derive(Debug, Clone)]
pub struct ChiSquareSurface {
    pub w: Vec<f64>,
    pub omega: Vec<f64>,
    pub chi2: DMatrix<f64>,
}

impl ChiSquareSurface {
    /// Arg-min over the surface.
    ///
    /// Ties break toward the smallest row index, then the smallest column
    /// index (row-major scan with strict `<`), so the result is deterministic.
    pub fn best_fit(&self) -> BestFit {
        let (mut i_min, mut j_min) = (0usize, 0usize);
        let mut min = self.chi2[(0, 0)];

        for i in 0..self.chi2.nrows() {
            for j in 0..self.chi2.ncols() {
                let v = self.chi2[(i, j)];
                if v < min {
                    min = v;
                    i_min = i;
                    j_min = j;
                }
            }
        }

        BestFit {
            w: self.w[i_min],
            omega0: self.omega[j_min],
            chi2: min,
            i_w: i_min,
            j_omega: j_min,
        }
    }

    /// Δχ² surface relative to the minimum (used for 1σ/2σ contours).
    pub fn delta(&self) -> DMatrix<f64> {
        let min = self.best_fit().chi2;
        self.chi2.map(|v| v - min)
    }
}

/// The minimizing grid cell and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestFit {
    pub w: f64,
    #[serde(rename = "omega_rip_0")]
    pub omega0: f64,
    pub chi2: f64,
    /// Row index into the surface (w axis).
    pub i_w: usize,
    /// Column index into the surface (Ω₀ axis).
    pub j_omega: usize,
}

/// Options that affect how the grid search evaluates each cell.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Smallest acceptable |field value| at the reference (z ≈ 0) index.
    ///
    /// Scaling divides by this value; anything below the floor is reported as
    /// a numeric error instead of producing a blown-up surface.
    pub v0_floor: f64,
    /// Out-of-range interpolation policy.
    pub extrapolation: ExtrapolationPolicy,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            v0_floor: 1e-12,
            extrapolation: ExtrapolationPolicy::Clamp,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Directory holding `run_*.csv` simulation outputs.
    pub data_dir: PathBuf,
    /// Directory for the surface CSV, best-fit CSV, and heat map.
    pub out_dir: PathBuf,

    pub omega_min: f64,
    pub omega_max: f64,
    pub omega_step: f64,

    pub w_min: f64,
    pub w_max: f64,
    pub w_step: f64,

    pub cosmology: Cosmology,

    /// Redshift grid used to build the age → z lookup.
    pub z_min: f64,
    pub z_max: f64,
    pub z_samples: usize,

    pub extrapolation: ExtrapolationPolicy,
    pub v0_floor: f64,

    pub plot: bool,
    pub plot_width: u32,
    pub plot_height: u32,

    /// Optional JSON export of the fit (metadata + best fit).
    pub export_fit: Option<PathBuf>,
}

/// A saved fit file (JSON).
///
/// This is the portable record of a run: enough metadata to reproduce the
/// sweep plus the best-fit point. The full surface lives in the CSV next to
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    /// Local timestamp of the run (RFC 3339).
    pub generated: String,
    pub cosmology: Cosmology,
    pub extrapolation: ExtrapolationPolicy,
    pub runs_averaged: usize,
    pub n_obs: usize,
    pub w_grid: Vec<f64>,
    pub omega_grid: Vec<f64>,
    pub best: BestFit,
    /// χ²_min / (n_obs − 2).
    pub reduced_chi2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_fit_breaks_ties_toward_smallest_indices() {
        let chi2 = DMatrix::from_row_slice(2, 2, &[5.0, 1.0, 1.0, 1.0]);
        let surface = ChiSquareSurface {
            w: vec![0.5, 0.6],
            omega: vec![0.7, 0.8],
            chi2,
        };

        let best = surface.best_fit();
        assert_eq!((best.i_w, best.j_omega), (0, 1));
        assert!((best.w - 0.5).abs() < 1e-15);
        assert!((best.omega0 - 0.8).abs() < 1e-15);
    }

    #[test]
    fn delta_surface_is_zero_at_minimum() {
        let chi2 = DMatrix::from_row_slice(2, 2, &[4.0, 3.0, 2.0, 9.0]);
        let surface = ChiSquareSurface {
            w: vec![0.5, 0.6],
            omega: vec![0.7, 0.8],
            chi2,
        };

        let delta = surface.delta();
        assert!((delta[(1, 0)]).abs() < 1e-15);
        assert!((delta[(1, 1)] - 7.0).abs() < 1e-15);
    }

    #[test]
    fn planck18_is_flat() {
        let c = Cosmology::planck18();
        assert!(c.validate().is_ok());
        let total = c.omega_m + c.omega_r + c.omega_lambda();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
