//! Parameter grid generation.
//!
//! The sweep is a deterministic grid search over (Ω₀, w).
//!
//! Why grid search?
//! - It avoids local minima issues common in nonlinear optimization.
//! - It is deterministic given the same inputs/flags.
//! - With two parameters and modest grids the sweep is fast enough for a
//!   batch analysis run.

use crate::error::AppError;

/// Generate an inclusive arithmetic grid from `min` to `max` in increments
/// of `step`.
///
/// `max` is included when it lies on the grid (within a small relative
/// tolerance), so e.g. `step_range(0.60, 0.78, 0.005)` has 37 points.
pub fn step_range(min: f64, max: f64, step: f64) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && step.is_finite()) {
        return Err(AppError::input(format!(
            "Invalid grid range: min={min}, max={max}, step={step} (must be finite)."
        )));
    }
    if step <= 0.0 {
        return Err(AppError::input(format!(
            "Invalid grid step {step} (must be > 0)."
        )));
    }
    if max < min {
        return Err(AppError::input(format!(
            "Invalid grid range: max={max} < min={min}."
        )));
    }

    // Tolerate floating-point shortfall at the top end, the way
    // `arange(min, max + step/2, step)` would.
    let count = ((max - min) / step + 0.5).floor() as usize;

    let mut out = Vec::with_capacity(count + 1);
    for i in 0..=count {
        let v = min + step * i as f64;
        if v <= max + step * 1e-9 {
            out.push(v.min(max));
        }
    }
    Ok(out)
}
