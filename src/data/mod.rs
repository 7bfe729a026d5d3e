//! Reference data and synthetic inputs.
//!
//! - `chronometers`: the embedded cosmic-chronometer H(z) compilation the
//!   fit runs against
//! - `synth`: seeded generation of `run_*.csv` files so the tool can be
//!   exercised without the external simulator

pub mod chronometers;
pub mod synth;

pub use chronometers::*;
pub use synth::*;
