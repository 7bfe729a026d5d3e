//! Small numeric primitives: interpolation and nearest-point lookup.

pub mod interp;

pub use interp::*;
