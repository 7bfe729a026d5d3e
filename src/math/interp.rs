//! Linear interpolation with an explicit out-of-range policy.
//!
//! The original analysis leaned on `np.interp`, which silently holds edge
//! values outside the tabulated range and has undefined behavior on an
//! unsorted axis. Here both choices are explicit:
//!
//! - callers sort the axis first (`sort_paired`)
//! - the out-of-range behavior is a named `ExtrapolationPolicy`

use crate::domain::ExtrapolationPolicy;

/// Index of the element closest to `target`.
///
/// Ties break toward the smallest index. Non-finite elements are never
/// selected. Returns `None` for an empty slice or one with no finite values.
pub fn index_nearest(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        let d = (v - target).abs();
        match best {
            Some((_, d_best)) if d >= d_best => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Sort two parallel slices by the first, returning sorted copies.
///
/// Used to put the (redshift, field) pairs into ascending-z order before
/// interpolation; the age mapping produces z descending in time.
pub fn sort_paired(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut idx: Vec<usize> = (0..xs.len()).collect();
    idx.sort_by(|&a, &b| xs[a].partial_cmp(&xs[b]).unwrap_or(std::cmp::Ordering::Equal));

    let xs_sorted = idx.iter().map(|&i| xs[i]).collect();
    let ys_sorted = idx.iter().map(|&i| ys[i]).collect();
    (xs_sorted, ys_sorted)
}

/// Linearly interpolate `ys` over the ascending axis `xs` at `xq`.
///
/// `xs` must be non-empty, ascending (duplicates allowed), and the same
/// length as `ys`. Behavior outside `[xs[0], xs[last]]` follows `policy`.
pub fn interp_linear(
    xs: &[f64],
    ys: &[f64],
    xq: f64,
    policy: ExtrapolationPolicy,
) -> Result<f64, String> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(format!(
            "Interpolation axis mismatch: {} x-values vs {} y-values.",
            xs.len(),
            ys.len()
        ));
    }
    if !xq.is_finite() {
        return Err(format!("Non-finite interpolation query x={xq}."));
    }

    let n = xs.len();
    if xq < xs[0] {
        return match policy {
            ExtrapolationPolicy::Clamp => Ok(ys[0]),
            ExtrapolationPolicy::Error => Err(format!(
                "Query x={xq} below tabulated range [{}, {}].",
                xs[0],
                xs[n - 1]
            )),
            ExtrapolationPolicy::Linear => Ok(extend(xs, ys, xq, Edge::Lower)),
        };
    }
    if xq > xs[n - 1] {
        return match policy {
            ExtrapolationPolicy::Clamp => Ok(ys[n - 1]),
            ExtrapolationPolicy::Error => Err(format!(
                "Query x={xq} above tabulated range [{}, {}].",
                xs[0],
                xs[n - 1]
            )),
            ExtrapolationPolicy::Linear => Ok(extend(xs, ys, xq, Edge::Upper)),
        };
    }

    // Find the first knot >= xq; the bracketing segment is [hi-1, hi].
    let hi = xs.partition_point(|&x| x < xq);
    if hi == 0 {
        return Ok(ys[0]);
    }
    let (x0, x1) = (xs[hi - 1], xs[hi.min(n - 1)]);
    let (y0, y1) = (ys[hi - 1], ys[hi.min(n - 1)]);

    // Duplicate knots (e.g. a clamped redshift axis) collapse to the lower y.
    if (x1 - x0).abs() < f64::EPSILON * x0.abs().max(1.0) {
        return Ok(y0);
    }

    let u = (xq - x0) / (x1 - x0);
    Ok(y0 + u * (y1 - y0))
}

#[derive(Clone, Copy)]
enum Edge {
    Lower,
    Upper,
}

/// Extend the end segment linearly; falls back to the edge value when no
/// distinct neighboring knot exists.
fn extend(xs: &[f64], ys: &[f64], xq: f64, edge: Edge) -> f64 {
    let n = xs.len();
    let (i0, i1) = match edge {
        Edge::Lower => {
            let Some(i1) = (1..n).find(|&i| xs[i] > xs[0]) else {
                return ys[0];
            };
            (0, i1)
        }
        Edge::Upper => {
            let Some(i0) = (0..n - 1).rev().find(|&i| xs[i] < xs[n - 1]) else {
                return ys[n - 1];
            };
            (i0, n - 1)
        }
    };

    let slope = (ys[i1] - ys[i0]) / (xs[i1] - xs[i0]);
    match edge {
        Edge::Lower => ys[0] + slope * (xq - xs[0]),
        Edge::Upper => ys[n - 1] + slope * (xq - xs[n - 1]),
    }
}
