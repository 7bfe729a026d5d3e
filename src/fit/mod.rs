//! Chi-square grid search.
//!
//! Responsibilities:
//!
//! - generate the Ω₀ and w candidate grids
//! - evaluate every (w, Ω₀) cell against the observed H(z) data (parallel)
//! - hand back the full surface; the arg-min lives on `ChiSquareSurface`

pub mod fitter;
pub mod grid;

pub use fitter::*;
pub use grid::*;
