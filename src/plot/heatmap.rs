//! Chi-square surface heat map.
//!
//! Renders the surface as filled cells on an (Ω₀, w) chart, overlays the
//! 1σ / 2σ confidence contours (Δχ² = 2.30 and 6.17 for two parameters), and
//! marks the best-fit point.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{BestFit, ChiSquareSurface};
use crate::error::AppError;

/// Δχ² levels enclosing 68.3% / 95.4% for two fitted parameters.
const SIGMA_LEVELS: [f64; 2] = [2.30, 6.17];

/// Render the surface to a PNG at `path`.
pub fn render_heatmap(
    path: &Path,
    surface: &ChiSquareSurface,
    best: &BestFit,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    if surface.w.is_empty() || surface.omega.is_empty() {
        return Err(AppError::data("Cannot plot an empty chi-square surface."));
    }
    let (width, height) = (width.max(320), height.max(240));

    let draw = || -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x0, x1) = padded_range(&surface.omega);
        let (y0, y1) = padded_range(&surface.w);

        let mut chart = ChartBuilder::on(&root)
            .caption("Chi-square surface for rip-field H(z) fit", ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Omega_rip_0")
            .y_desc("w (evolution index)")
            .draw()?;

        // Filled cell per grid point.
        let (chi_min, chi_max) = value_range(surface);
        let span = (chi_max - chi_min).max(f64::MIN_POSITIVE);
        for i in 0..surface.w.len() {
            let (wy0, wy1) = cell_bounds(&surface.w, i);
            for j in 0..surface.omega.len() {
                let (ox0, ox1) = cell_bounds(&surface.omega, j);
                let t = ((surface.chi2[(i, j)] - chi_min) / span).clamp(0.0, 1.0);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(ox0, wy0), (ox1, wy1)],
                    viridis(t).filled(),
                )))?;
            }
        }

        // 1σ / 2σ contours on the delta surface.
        let delta = surface.delta();
        let grid: Vec<Vec<f64>> = (0..surface.w.len())
            .map(|i| (0..surface.omega.len()).map(|j| delta[(i, j)]).collect())
            .collect();
        for (level, label) in SIGMA_LEVELS.iter().zip(["1σ", "2σ"]) {
            let segments = contour_segments(&surface.omega, &surface.w, &grid, *level);
            for (a, b) in &segments {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![*a, *b],
                    WHITE.stroke_width(1),
                )))?;
            }
            if let Some(&((x, y), _)) = segments.first() {
                chart.draw_series(std::iter::once(Text::new(
                    label.to_string(),
                    (x, y),
                    ("sans-serif", 14).into_font().color(&WHITE),
                )))?;
            }
        }

        // Best-fit marker.
        chart.draw_series(std::iter::once(Cross::new(
            (best.omega0, best.w),
            7,
            RED.stroke_width(2),
        )))?;

        root.present()?;
        Ok(())
    };

    draw().map_err(|e| {
        AppError::input(format!("Failed to render heat map '{}': {e}", path.display()))
    })
}

/// Half-open bounds of grid cell `i`, using neighbor midpoints.
fn cell_bounds(axis: &[f64], i: usize) -> (f64, f64) {
    let half = |a: f64, b: f64| (b - a) / 2.0;
    let step = if axis.len() > 1 {
        if i + 1 < axis.len() {
            half(axis[i], axis[i + 1])
        } else {
            half(axis[i - 1], axis[i])
        }
    } else {
        0.5 * axis[0].abs().max(0.01)
    };
    let lo = if i > 0 { axis[i] - half(axis[i - 1], axis[i]) } else { axis[i] - step };
    let hi = if i + 1 < axis.len() { axis[i] + half(axis[i], axis[i + 1]) } else { axis[i] + step };
    (lo, hi)
}

fn padded_range(axis: &[f64]) -> (f64, f64) {
    let (lo, _) = cell_bounds(axis, 0);
    let (_, hi) = cell_bounds(axis, axis.len() - 1);
    (lo, hi)
}

fn value_range(surface: &ChiSquareSurface) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in surface.chi2.iter() {
        min = min.min(*v);
        max = max.max(*v);
    }
    (min, max)
}

/// Marching-squares contour extraction.
///
/// `grid[i][j]` is the value at (`ys[i]`, `xs[j]`). Returns line segments in
/// data coordinates. Each cell contributes the segment(s) joining its
/// level-crossing edge points; saddle cells pair crossings in edge order,
/// which is adequate for confidence contours on a smooth surface.
pub fn contour_segments(
    xs: &[f64],
    ys: &[f64],
    grid: &[Vec<f64>],
    level: f64,
) -> Vec<((f64, f64), (f64, f64))> {
    let mut segments = Vec::new();
    if ys.len() < 2 || xs.len() < 2 {
        return segments;
    }

    for i in 0..ys.len() - 1 {
        for j in 0..xs.len() - 1 {
            // Corner values, counter-clockwise from (i, j).
            let corners = [
                (grid[i][j], xs[j], ys[i]),
                (grid[i][j + 1], xs[j + 1], ys[i]),
                (grid[i + 1][j + 1], xs[j + 1], ys[i + 1]),
                (grid[i + 1][j], xs[j], ys[i + 1]),
            ];

            let mut crossings = Vec::new();
            for k in 0..4 {
                let (v0, x0, y0) = corners[k];
                let (v1, x1, y1) = corners[(k + 1) % 4];
                let below0 = v0 < level;
                let below1 = v1 < level;
                if below0 != below1 {
                    let u = (level - v0) / (v1 - v0);
                    crossings.push((x0 + u * (x1 - x0), y0 + u * (y1 - y0)));
                }
            }

            match crossings.len() {
                2 => segments.push((crossings[0], crossings[1])),
                4 => {
                    segments.push((crossings[0], crossings[1]));
                    segments.push((crossings[2], crossings[3]));
                }
                _ => {}
            }
        }
    }

    segments
}

/// Viridis-style color ramp (dark purple → teal → yellow).
fn viridis(t: f64) -> RGBColor {
    const ANCHORS: [(f64, f64, f64); 6] = [
        (0.267, 0.005, 0.329),
        (0.283, 0.141, 0.458),
        (0.207, 0.372, 0.553),
        (0.128, 0.567, 0.551),
        (0.478, 0.821, 0.318),
        (0.993, 0.906, 0.144),
    ];

    let t = t.clamp(0.0, 1.0);
    let pos = t * (ANCHORS.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(ANCHORS.len() - 1);
    let u = pos - lo as f64;

    let lerp = |a: f64, b: f64| a + u * (b - a);
    let (r0, g0, b0) = ANCHORS[lo];
    let (r1, g1, b1) = ANCHORS[hi];
    RGBColor(
        (lerp(r0, r1) * 255.0).round() as u8,
        (lerp(g0, g1) * 255.0).round() as u8,
        (lerp(b0, b1) * 255.0).round() as u8,
    )
}
