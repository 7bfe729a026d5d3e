//! Heat-map rendering of the chi-square surface.

pub mod heatmap;

pub use heatmap::*;
