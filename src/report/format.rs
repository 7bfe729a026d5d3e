//! Terminal output formatting.

use crate::app::pipeline::RunOutput;
use crate::domain::{BestFit, FitConfig};

/// Format the full run summary (input stats + sweep shape + cosmology).
pub fn format_run_summary(run: &RunOutput, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== ripfit - rip-field H(z) grid search ===\n");
    out.push_str(&format!(
        "Runs averaged: {} | curve points: {}\n",
        run.curve.runs,
        run.curve.len()
    ));

    if let (Some(t0), Some(t1)) = (run.curve.time_myr.first(), run.curve.time_myr.last()) {
        out.push_str(&format!("Simulated time: [{t0:.0}, {t1:.0}] Myr\n"));
    }

    let (z_lo, z_hi) = min_max(&run.z_sim);
    out.push_str(&format!("Mapped redshift: [{z_lo:.4}, {z_hi:.4}]\n"));

    out.push_str(&format!(
        "Observed points: {} | grid: {} w × {} Omega\n",
        run.observed.len(),
        run.surface.w.len(),
        run.surface.omega.len()
    ));
    out.push_str(&format!(
        "Cosmology: H0={} km/s/Mpc, Omega_m={}, Omega_r={:e}\n",
        config.cosmology.h0, config.cosmology.omega_m, config.cosmology.omega_r
    ));
    out.push_str(&format!("Extrapolation: {:?}\n", config.extrapolation));

    out
}

/// Format the best-fit block, including reduced chi-square.
pub fn format_best_fit(best: &BestFit, n_obs: usize) -> String {
    let mut out = String::new();

    out.push_str("Best fit:\n");
    out.push_str(&format!("- w           = {:.4}\n", best.w));
    out.push_str(&format!("- omega_rip_0 = {:.4}\n", best.omega0));
    out.push_str(&format!("- chi2        = {:.4}\n", best.chi2));
    out.push_str(&format!(
        "- chi2/dof    = {:.4} (dof = {})\n",
        best.chi2 / reduced_dof(n_obs) as f64,
        reduced_dof(n_obs)
    ));

    out
}

/// Degrees of freedom for the two-parameter fit, floored at 1.
pub fn reduced_dof(n_obs: usize) -> usize {
    n_obs.saturating_sub(2).max(1)
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dof_is_n_minus_two_with_floor() {
        assert_eq!(reduced_dof(29), 27);
        assert_eq!(reduced_dof(2), 1);
        assert_eq!(reduced_dof(0), 1);
    }

    #[test]
    fn best_fit_block_names_all_parameters() {
        let best = BestFit {
            w: 0.5,
            omega0: 0.7,
            chi2: 17.3,
            i_w: 0,
            j_omega: 0,
        };
        let text = format_best_fit(&best, 29);
        assert!(text.contains("omega_rip_0"));
        assert!(text.contains("chi2/dof"));
    }
}
