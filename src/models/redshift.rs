//! Time → redshift mapping.
//!
//! The simulator emits field strength against cosmic time (Myr). To compare
//! with observations we reinterpret that axis as redshift: tabulate the
//! cosmic age on a fixed z grid, invert the (monotonic) table, and look each
//! simulated time up by interpolation.
//!
//! Times outside the tabulated age range clamp to the grid ends. This is the
//! mapping's own boundary behavior and is independent of the fit's
//! `ExtrapolationPolicy`, which governs interpolating the *field curve* onto
//! observed redshifts.

use crate::domain::{Cosmology, ExtrapolationPolicy};
use crate::error::AppError;
use crate::math::interp_linear;
use crate::models::hubble::age_gyr;

/// Monotonic lookup from cosmic age to redshift, built once per run.
#[derive(Debug, Clone)]
pub struct RedshiftMap {
    /// Ages in Gyr, ascending.
    ages_gyr: Vec<f64>,
    /// Redshift at each age (descending, since older ⇒ closer to today).
    z_by_age: Vec<f64>,
}

impl RedshiftMap {
    /// Build the map from a linear z grid of `samples` points on
    /// `[z_min, z_max]`.
    pub fn new(cosmo: &Cosmology, z_min: f64, z_max: f64, samples: usize) -> Result<Self, AppError> {
        cosmo.validate().map_err(AppError::input)?;
        if !(z_min.is_finite() && z_max.is_finite() && z_min > 0.0 && z_max > z_min) {
            return Err(AppError::input(format!(
                "Invalid redshift grid: z_min={z_min}, z_max={z_max} (must be finite, >0, and z_max>z_min)."
            )));
        }
        if samples < 2 {
            return Err(AppError::input("Redshift grid needs at least 2 samples."));
        }

        let step = (z_max - z_min) / (samples as f64 - 1.0);

        // Walk the z grid from high to low so ages come out ascending.
        let mut ages_gyr = Vec::with_capacity(samples);
        let mut z_by_age = Vec::with_capacity(samples);
        for i in (0..samples).rev() {
            let z = z_min + step * i as f64;
            ages_gyr.push(age_gyr(cosmo, z));
            z_by_age.push(z);
        }

        Ok(Self { ages_gyr, z_by_age })
    }

    /// Redshift corresponding to a simulated time in Myr.
    pub fn redshift_at(&self, time_myr: f64) -> Result<f64, AppError> {
        let t_gyr = time_myr / 1_000.0;
        interp_linear(&self.ages_gyr, &self.z_by_age, t_gyr, ExtrapolationPolicy::Clamp)
            .map_err(AppError::numeric)
    }

    /// Map a whole time axis to redshift, preserving order.
    pub fn redshift_axis(&self, time_myr: &[f64]) -> Result<Vec<f64>, AppError> {
        time_myr.iter().map(|&t| self.redshift_at(t)).collect()
    }
}
