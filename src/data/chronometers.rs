//! Cosmic-chronometer H(z) compilation.
//!
//! A fixed 29-row table of (z, H, σ) measurements in km/s/Mpc. This is
//! immutable reference data; it is compiled in rather than read from disk,
//! but always flows into the fitter as an argument so tests can substitute
//! synthetic observations.

use crate::domain::HubblePoint;

/// (z, H, σ) rows, ascending in z.
const CC_HZ: [(f64, f64, f64); 29] = [
    (0.07, 69.0, 19.6),
    (0.10, 69.0, 12.0),
    (0.12, 68.6, 26.2),
    (0.17, 83.0, 8.0),
    (0.179, 75.0, 4.0),
    (0.199, 75.0, 5.0),
    (0.20, 72.9, 29.6),
    (0.27, 77.0, 14.0),
    (0.28, 88.8, 36.6),
    (0.352, 83.0, 14.0),
    (0.40, 95.0, 17.0),
    (0.44, 82.6, 7.8),
    (0.48, 97.0, 62.0),
    (0.593, 104.0, 13.0),
    (0.60, 87.9, 5.4),
    (0.68, 92.0, 8.0),
    (0.73, 97.3, 7.0),
    (0.781, 105.0, 12.0),
    (0.875, 125.0, 17.0),
    (0.88, 90.0, 40.0),
    (0.90, 117.0, 23.0),
    (1.037, 154.0, 20.0),
    (1.30, 168.0, 13.0),
    (1.43, 177.0, 18.0),
    (1.53, 140.0, 14.0),
    (1.75, 202.0, 40.0),
    (1.965, 186.5, 50.4),
    (2.34, 222.0, 7.0),
    (2.36, 226.0, 9.3),
];

/// The observed dataset as fit-ready points.
pub fn observed_hz() -> Vec<HubblePoint> {
    CC_HZ
        .iter()
        .map(|&(z, h, sigma)| HubblePoint { z, h, sigma })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_29_valid_rows() {
        let obs = observed_hz();
        assert_eq!(obs.len(), 29);
        for p in &obs {
            assert!(p.z > 0.0 && p.h > 0.0 && p.sigma > 0.0);
        }
    }

    #[test]
    fn redshifts_are_ascending() {
        let obs = observed_hz();
        for pair in obs.windows(2) {
            assert!(pair[0].z < pair[1].z);
        }
    }
}
