//! Background-cosmology evaluation.
//!
//! Two primitives drive the fit:
//!
//! - the closed-form Hubble rate given a dark-energy-like density (`hubble`)
//! - the cosmic-age integral and its inversion into a time → redshift
//!   lookup (`redshift`)

pub mod hubble;
pub mod redshift;

pub use hubble::*;
pub use redshift::*;
