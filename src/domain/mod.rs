//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration (`Cosmology`, `ExtrapolationPolicy`, `FitConfig`)
//! - normalized observations (`HubblePoint`) and the mean field curve
//! - fit outputs (`ChiSquareSurface`, `BestFit`, `FitFile`)

pub mod types;

pub use types::*;
