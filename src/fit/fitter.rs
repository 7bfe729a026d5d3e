//! The grid-search fitter.
//!
//! Given:
//! - the mean rip-field curve and its redshift axis
//! - observed (z, H, σ) triples
//! - candidate Ω₀ and w grids
//!
//! we compute, for each (w, Ω₀) pair:
//! - the scaled, redshift-evolved density curve
//! - its interpolation onto the observed redshifts
//! - the model H(z) and the resulting chi-square
//!
//! and return the full surface. Each w row is independent, so rows are
//! evaluated in parallel.

use rayon::prelude::*;

use crate::domain::{ChiSquareSurface, Cosmology, FitOptions, HubblePoint};
use crate::error::AppError;
use crate::math::{index_nearest, interp_linear, sort_paired};
use crate::models::hubble_rate;
use nalgebra::DMatrix;

/// Everything the grid search needs, passed explicitly so the core is
/// testable with synthetic inputs.
#[derive(Debug, Clone, Copy)]
pub struct FitInputs<'a> {
    /// Mean field strength per simulated time step.
    pub field: &'a [f64],
    /// Redshift at each time step (same length as `field`, any order).
    pub z_sim: &'a [f64],
    /// Observed H(z) measurements, σ > 0.
    pub observed: &'a [HubblePoint],
    /// Candidate Ω₀ values (surface columns).
    pub omega_grid: &'a [f64],
    /// Candidate w values (surface rows).
    pub w_grid: &'a [f64],
    pub cosmology: &'a Cosmology,
}

/// One point of the scaled, redshift-evolved density curve:
///
/// `Ω(z) = value · scale · (1+z)^(−w)`
///
/// where `scale = Ω₀ / v0` normalizes the curve so its value at the
/// reference (z ≈ 0) index equals Ω₀.
pub fn scaled_density(value: f64, z: f64, scale: f64, w: f64) -> f64 {
    value * scale * (1.0 + z).powf(-w)
}

/// Sweep the (w, Ω₀) grid and return the chi-square surface.
pub fn fit_grid(inputs: &FitInputs, opts: &FitOptions) -> Result<ChiSquareSurface, AppError> {
    validate(inputs, opts)?;

    // Reference field value at the index nearest z = 0 (smallest index wins
    // ties). A near-zero reference would blow up the scale factor, so it is
    // reported instead of divided by. `validate` has already rejected empty
    // and non-finite axes, so the lookup always succeeds.
    let idx0 = index_nearest(inputs.z_sim, 0.0).unwrap_or_default();
    let v0 = inputs.field[idx0];
    if v0.abs() < opts.v0_floor {
        return Err(AppError::numeric(format!(
            "Reference field value at z≈0 is degenerate: |{v0:e}| < floor {:e} (index {idx0}).",
            opts.v0_floor
        )));
    }

    // The age map yields z descending in time; interpolation needs ascending.
    let (z_sorted, field_sorted) = sort_paired(inputs.z_sim, inputs.field);

    let rows: Vec<Vec<f64>> = inputs
        .w_grid
        .par_iter()
        .map(|&w| evaluate_row(w, v0, &z_sorted, &field_sorted, inputs, opts))
        .collect::<Result<_, _>>()?;

    let n_w = inputs.w_grid.len();
    let n_omega = inputs.omega_grid.len();
    let chi2 = DMatrix::from_fn(n_w, n_omega, |i, j| rows[i][j]);

    Ok(ChiSquareSurface {
        w: inputs.w_grid.to_vec(),
        omega: inputs.omega_grid.to_vec(),
        chi2,
    })
}

/// Evaluate one w row of the surface.
///
/// The (1+z)^(−w) evolution and the interpolation onto observed redshifts
/// depend only on w, so they are computed once per row; the Ω₀ scaling is
/// applied per column.
fn evaluate_row(
    w: f64,
    v0: f64,
    z_sorted: &[f64],
    field_sorted: &[f64],
    inputs: &FitInputs,
    opts: &FitOptions,
) -> Result<Vec<f64>, AppError> {
    // Evolve at unit scale; interpolation is linear in the values, so the
    // per-column Ω₀/v0 scale commutes with it and is applied afterwards.
    let evolved: Vec<f64> = z_sorted
        .iter()
        .zip(field_sorted.iter())
        .map(|(&z, &f)| scaled_density(f, z, 1.0, w))
        .collect();

    let mut evolved_at_obs = Vec::with_capacity(inputs.observed.len());
    for p in inputs.observed {
        let e = interp_linear(z_sorted, &evolved, p.z, opts.extrapolation)
            .map_err(AppError::numeric)?;
        evolved_at_obs.push(e);
    }

    let mut row = Vec::with_capacity(inputs.omega_grid.len());
    for &omega0 in inputs.omega_grid {
        let scale = omega0 / v0;
        let mut chi2 = 0.0;
        for (p, &e) in inputs.observed.iter().zip(evolved_at_obs.iter()) {
            let h_model = hubble_rate(inputs.cosmology, p.z, scale * e);
            let r = (h_model - p.h) / p.sigma;
            chi2 += r * r;
        }

        if !chi2.is_finite() {
            return Err(AppError::numeric(format!(
                "Non-finite chi-square at (w={w}, omega_rip_0={omega0}); \
                 the evolved density likely drove H² negative."
            )));
        }
        row.push(chi2);
    }

    Ok(row)
}

fn validate(inputs: &FitInputs, opts: &FitOptions) -> Result<(), AppError> {
    inputs.cosmology.validate().map_err(AppError::input)?;

    if inputs.field.is_empty() {
        return Err(AppError::data("Field curve is empty."));
    }
    if inputs.field.len() != inputs.z_sim.len() {
        return Err(AppError::data(format!(
            "Field curve has {} points but redshift axis has {}.",
            inputs.field.len(),
            inputs.z_sim.len()
        )));
    }
    if inputs.observed.is_empty() {
        return Err(AppError::data("No observed H(z) points."));
    }
    if inputs.omega_grid.is_empty() || inputs.w_grid.is_empty() {
        return Err(AppError::input("Parameter grids must be non-empty."));
    }

    if let Some(v) = inputs.field.iter().find(|v| !v.is_finite()) {
        return Err(AppError::data(format!("Non-finite field value {v} in curve.")));
    }
    if let Some(z) = inputs.z_sim.iter().find(|z| !z.is_finite()) {
        return Err(AppError::data(format!("Non-finite redshift {z} in axis.")));
    }
    for (i, p) in inputs.observed.iter().enumerate() {
        if !(p.z.is_finite() && p.h.is_finite()) {
            return Err(AppError::data(format!(
                "Observed point {i} has non-finite values (z={}, H={}).",
                p.z, p.h
            )));
        }
        if !(p.sigma.is_finite() && p.sigma > 0.0) {
            return Err(AppError::data(format!(
                "Observed point {i} has invalid sigma={} (must be finite and > 0).",
                p.sigma
            )));
        }
    }
    if inputs
        .omega_grid
        .iter()
        .chain(inputs.w_grid.iter())
        .any(|v| !v.is_finite())
    {
        return Err(AppError::input("Parameter grids contain non-finite values."));
    }
    if !(opts.v0_floor.is_finite() && opts.v0_floor > 0.0) {
        return Err(AppError::input(format!(
            "Invalid v0 floor {} (must be finite and > 0).",
            opts.v0_floor
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExtrapolationPolicy;

    fn test_cosmology() -> Cosmology {
        Cosmology {
            h0: 67.7,
            omega_m: 0.315,
            omega_r: 9.24e-5,
        }
    }

    fn obs(z: f64, h: f64, sigma: f64) -> HubblePoint {
        HubblePoint { z, h, sigma }
    }

    #[test]
    fn constant_curve_with_zero_w_yields_omega0_everywhere() {
        // Scale cancels evolution: for a constant field and w = 0 the scaled
        // density equals Ω₀ at every redshift.
        let c = 3.7e-4;
        let omega0 = 0.68;
        let scale = omega0 / c;
        for z in [0.0, 0.5, 1.3, 2.4, 9.9] {
            let d = scaled_density(c, z, scale, 0.0);
            assert!((d - omega0).abs() < 1e-12, "z={z}: {d}");
        }
    }

    #[test]
    fn one_by_one_surface_matches_manual_substitution() {
        // Spec scenario: a single grid cell and a single observation.
        let cosmo = test_cosmology();
        let inputs = FitInputs {
            field: &[1.0],
            z_sim: &[0.0],
            observed: &[obs(0.0, 70.0, 1.0)],
            omega_grid: &[0.70],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };

        let surface = fit_grid(&inputs, &FitOptions::default()).unwrap();
        assert_eq!(surface.chi2.nrows(), 1);
        assert_eq!(surface.chi2.ncols(), 1);

        let h_model = 67.7 * (0.315 + 9.24e-5 + 0.70f64).sqrt();
        let want = ((h_model - 70.0) / 1.0).powi(2);
        assert!((surface.chi2[(0, 0)] - want).abs() < 1e-12);

        let best = surface.best_fit();
        assert!((best.chi2 - want).abs() < 1e-12);
        assert!((best.w - 0.5).abs() < 1e-15);
        assert!((best.omega0 - 0.70).abs() < 1e-15);
    }

    #[test]
    fn best_fit_is_the_surface_minimum() {
        let cosmo = test_cosmology();
        let field: Vec<f64> = (0..50).map(|i| 1.0 + 0.02 * i as f64).collect();
        let z_sim: Vec<f64> = (0..50).map(|i| 2.0 - 0.04 * i as f64).collect();
        let observed: Vec<HubblePoint> = (0..10)
            .map(|i| obs(0.1 + 0.2 * i as f64, 70.0 + 15.0 * i as f64, 5.0))
            .collect();
        let omega_grid: Vec<f64> = (0..7).map(|j| 0.60 + 0.03 * j as f64).collect();
        let w_grid: Vec<f64> = (0..5).map(|i| 0.5 + 0.1 * i as f64).collect();

        let inputs = FitInputs {
            field: &field,
            z_sim: &z_sim,
            observed: &observed,
            omega_grid: &omega_grid,
            w_grid: &w_grid,
            cosmology: &cosmo,
        };
        let surface = fit_grid(&inputs, &FitOptions::default()).unwrap();
        let best = surface.best_fit();

        for i in 0..surface.chi2.nrows() {
            for j in 0..surface.chi2.ncols() {
                assert!(best.chi2 <= surface.chi2[(i, j)]);
            }
        }
        assert!((surface.chi2[(best.i_w, best.j_omega)] - best.chi2).abs() < 1e-15);
        assert!((surface.w[best.i_w] - best.w).abs() < 1e-15);
        assert!((surface.omega[best.j_omega] - best.omega0).abs() < 1e-15);
    }

    #[test]
    fn recovers_known_parameters_from_noiseless_observations() {
        // Build observations exactly from the model at a known grid point;
        // chi-square there must be the global minimum and ≈ 0.
        let cosmo = test_cosmology();
        let (true_omega0, true_w) = (0.70, 0.75);

        // A smooth decaying field over a descending-z axis (like real input).
        let n = 200;
        let z_sim: Vec<f64> = (0..n).map(|i| 3.0 * (1.0 - i as f64 / (n - 1) as f64)).collect();
        let field: Vec<f64> = z_sim.iter().map(|&z| 2.0e-3 * (-0.3 * z).exp()).collect();

        let idx0 = index_nearest(&z_sim, 0.0).unwrap();
        let v0 = field[idx0];
        let scale = true_omega0 / v0;

        let (z_sorted, field_sorted) = sort_paired(&z_sim, &field);
        let evolved: Vec<f64> = z_sorted
            .iter()
            .zip(field_sorted.iter())
            .map(|(&z, &f)| f * (1.0 + z).powf(-true_w))
            .collect();

        let observed: Vec<HubblePoint> = (1..=12)
            .map(|i| {
                let z = 0.2 * i as f64;
                let e = interp_linear(&z_sorted, &evolved, z, ExtrapolationPolicy::Clamp).unwrap();
                obs(z, hubble_rate(&cosmo, z, scale * e), 1.0)
            })
            .collect();

        let omega_grid = [0.60, 0.65, 0.70, 0.75];
        let w_grid = [0.5, 0.75, 1.0];
        let inputs = FitInputs {
            field: &field,
            z_sim: &z_sim,
            observed: &observed,
            omega_grid: &omega_grid,
            w_grid: &w_grid,
            cosmology: &cosmo,
        };

        let best = fit_grid(&inputs, &FitOptions::default()).unwrap().best_fit();
        assert!((best.omega0 - true_omega0).abs() < 1e-12);
        assert!((best.w - true_w).abs() < 1e-12);
        assert!(best.chi2 < 1e-12, "chi2={}", best.chi2);
    }

    #[test]
    fn clamp_policy_covers_observations_outside_simulated_range() {
        let cosmo = test_cosmology();
        // Simulated range [0.5, 2.0]; observations straddle both ends.
        let z_sim = [2.0, 1.5, 1.0, 0.5];
        let field = [1.0e-3, 1.1e-3, 1.2e-3, 1.3e-3];
        let observed = [obs(0.07, 69.0, 19.6), obs(2.36, 226.0, 9.3)];

        let inputs = FitInputs {
            field: &field,
            z_sim: &z_sim,
            observed: &observed,
            omega_grid: &[0.70],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };

        let surface = fit_grid(&inputs, &FitOptions::default()).unwrap();
        assert!(surface.chi2[(0, 0)].is_finite());

        // The same inputs under the error policy must refuse to extrapolate.
        let strict = FitOptions {
            extrapolation: ExtrapolationPolicy::Error,
            ..FitOptions::default()
        };
        let err = fit_grid(&inputs, &strict).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn non_finite_chi_square_is_a_numeric_error() {
        // A strongly negative field value drives H² negative at the
        // observation, so the chi-square goes NaN and must be reported
        // rather than written into the surface.
        let cosmo = test_cosmology();
        let inputs = FitInputs {
            field: &[1.0, -100.0],
            z_sim: &[0.0, 1.0],
            observed: &[obs(1.0, 100.0, 5.0)],
            omega_grid: &[0.70],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };

        let err = fit_grid(&inputs, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn degenerate_reference_value_is_a_numeric_error() {
        let cosmo = test_cosmology();
        let inputs = FitInputs {
            field: &[0.0, 1.0],
            z_sim: &[0.0, 1.0],
            observed: &[obs(0.5, 80.0, 5.0)],
            omega_grid: &[0.70],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };

        let err = fit_grid(&inputs, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn malformed_inputs_fail_fast() {
        let cosmo = test_cosmology();
        let good_obs = [obs(0.5, 80.0, 5.0)];

        // Mismatched lengths.
        let inputs = FitInputs {
            field: &[1.0, 2.0],
            z_sim: &[0.0],
            observed: &good_obs,
            omega_grid: &[0.7],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };
        assert_eq!(fit_grid(&inputs, &FitOptions::default()).unwrap_err().exit_code(), 3);

        // Empty grid.
        let inputs = FitInputs {
            field: &[1.0],
            z_sim: &[0.0],
            observed: &good_obs,
            omega_grid: &[],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };
        assert_eq!(fit_grid(&inputs, &FitOptions::default()).unwrap_err().exit_code(), 2);

        // Non-positive sigma.
        let bad_obs = [obs(0.5, 80.0, 0.0)];
        let inputs = FitInputs {
            field: &[1.0],
            z_sim: &[0.0],
            observed: &bad_obs,
            omega_grid: &[0.7],
            w_grid: &[0.5],
            cosmology: &cosmo,
        };
        assert_eq!(fit_grid(&inputs, &FitOptions::default()).unwrap_err().exit_code(), 3);
    }
}
