//! Hubble-rate model and the flat-ΛCDM age integral.
//!
//! The fitter needs `H(z)` for a given rip-field density contribution, and
//! the redshift map needs the cosmic age at a given redshift. Both come from
//! the Friedmann equation with fixed matter/radiation fractions and
//! `Ω_Λ = 1 − Ω_m − Ω_r`.

use crate::domain::Cosmology;

/// km/s/Mpc expressed in 1/Gyr (1 Mpc = 3.0857e19 km, 1 Gyr = 3.1557e16 s).
const KMS_MPC_PER_GYR: f64 = 1.022_712_17e-3;

/// `E²(z) = Ω_m (1+z)³ + Ω_r (1+z)⁴ + Ω_x`, the dimensionless expansion
/// rate squared.
///
/// `omega_x` is the dark-energy-like density contribution at this redshift
/// (the scaled, evolved rip-field value in the fit).
pub fn e_squared(cosmo: &Cosmology, z: f64, omega_x: f64) -> f64 {
    let zp1 = 1.0 + z;
    cosmo.omega_m * zp1.powi(3) + cosmo.omega_r * zp1.powi(4) + omega_x
}

/// Model Hubble rate in km/s/Mpc: `H(z) = H0 · sqrt(E²(z))`.
pub fn hubble_rate(cosmo: &Cosmology, z: f64, omega_x: f64) -> f64 {
    cosmo.h0 * e_squared(cosmo, z, omega_x).sqrt()
}

/// Cosmic age at redshift `z` in Gyr, assuming flat ΛCDM.
///
/// `t(z) = (1/H0) ∫₀^{1/(1+z)} da / (a·E(a))` with
/// `E(a) = sqrt(Ω_m a⁻³ + Ω_r a⁻⁴ + Ω_Λ)`. The integrand rewritten as
/// `a / sqrt(Ω_m a + Ω_r + Ω_Λ a⁴)` is finite at `a = 0`, so plain Simpson
/// integration converges quickly.
pub fn age_gyr(cosmo: &Cosmology, z: f64) -> f64 {
    let a_end = 1.0 / (1.0 + z);
    let omega_l = cosmo.omega_lambda();

    let integrand = |a: f64| {
        let under = cosmo.omega_m * a + cosmo.omega_r + omega_l * a.powi(4);
        if under <= 0.0 { 0.0 } else { a / under.sqrt() }
    };

    let integral = simpson(integrand, 0.0, a_end, 2048);
    integral / (cosmo.h0 * KMS_MPC_PER_GYR)
}

/// Composite Simpson's rule with `n` (even) subintervals.
fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + h * i as f64;
        sum += if i % 2 == 1 { 4.0 * f(x) } else { 2.0 * f(x) };
    }
    sum * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hubble_rate_recovers_h0_at_z0_for_flat_budget() {
        let cosmo = Cosmology::planck18();
        let h = hubble_rate(&cosmo, 0.0, cosmo.omega_lambda());
        assert!((h - cosmo.h0).abs() < 1e-9);
    }

    #[test]
    fn hubble_rate_matches_manual_substitution() {
        let cosmo = Cosmology {
            h0: 67.7,
            omega_m: 0.315,
            omega_r: 9.24e-5,
        };
        let h = hubble_rate(&cosmo, 0.0, 0.70);
        let want = 67.7 * (0.315 + 9.24e-5 + 0.70f64).sqrt();
        assert!((h - want).abs() < 1e-12);
    }

    #[test]
    fn age_of_planck18_universe_is_about_13_8_gyr() {
        let cosmo = Cosmology::planck18();
        let t0 = age_gyr(&cosmo, 0.0);
        assert!((13.5..14.1).contains(&t0), "t0={t0}");
    }

    #[test]
    fn age_decreases_with_redshift() {
        let cosmo = Cosmology::planck18();
        let mut prev = age_gyr(&cosmo, 0.0);
        for z in [0.5, 1.0, 2.0, 5.0, 10.0] {
            let t = age_gyr(&cosmo, z);
            assert!(t < prev, "age(z={z})={t} not below {prev}");
            assert!(t > 0.0);
            prev = t;
        }
    }

    #[test]
    fn simpson_integrates_a_parabola_exactly() {
        let v = simpson(|x| x * x, 0.0, 3.0, 16);
        assert!((v - 9.0).abs() < 1e-12);
    }
}
