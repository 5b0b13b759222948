//! Shared brush geometry: falloff curve, footprint metrics, and the bounded
//! cell visitor every kernel is built on.
//!
//! The visitor computes the affected index sub-rectangle from the stroke's
//! world bounds before looping, so a stroke costs O(affected cells) no
//! matter how large the grid is.

use crate::stroke::BrushStroke;

/// Cubic Hermite ease, clamped to [0, 1]. C1-continuous at both ends, which
/// keeps brush edges free of visible creases.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Falloff weight for a cell at distance `d` from the stroke center.
///
/// 1 at the center, exactly 0 at and beyond the radius, monotonically
/// decreasing in between.
pub fn falloff_weight(d: f32, radius: f32) -> f32 {
    if d >= radius {
        0.0
    } else {
        smoothstep(1.0 - d / radius)
    }
}

/// Footprint shape of a brush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Circular footprint, Euclidean distance.
    Euclidean,
    /// Square footprint, Chebyshev distance `max(|dx|, |dz|)`.
    Chebyshev,
}

/// Visit every vertex the stroke can affect, with its falloff weight.
///
/// Calls `f(flat_index, weight)` for each accepted cell. Degenerate strokes
/// visit nothing, which is how every kernel degrades to a no-op copy.
pub fn visit_cells<F: FnMut(usize, f32)>(stroke: &BrushStroke, metric: Metric, mut f: F) {
    if stroke.is_degenerate() {
        return;
    }

    let step_x = stroke.step_x();
    let step_z = stroke.step_z();
    let half_w = stroke.world_width / 2.0;
    let half_l = stroke.world_length / 2.0;
    let r = stroke.radius;

    let ix0 = (((stroke.center_x - r + half_w) / step_x).ceil().max(0.0)) as usize;
    let iz0 = (((stroke.center_z - r + half_l) / step_z).ceil().max(0.0)) as usize;
    let ix1 = ((stroke.center_x + r + half_w) / step_x).floor();
    let iz1 = ((stroke.center_z + r + half_l) / step_z).floor();
    if ix1 < 0.0 || iz1 < 0.0 {
        return;
    }
    let ix1 = (ix1 as usize).min(stroke.vertex_width - 1);
    let iz1 = (iz1 as usize).min(stroke.vertex_length - 1);

    let r2 = r * r;
    for iz in iz0..=iz1 {
        let dz = iz as f32 * step_z - half_l - stroke.center_z;
        for ix in ix0..=ix1 {
            let dx = ix as f32 * step_x - half_w - stroke.center_x;
            let d = match metric {
                Metric::Euclidean => {
                    let d2 = dx * dx + dz * dz;
                    if d2 > r2 {
                        continue;
                    }
                    d2.sqrt()
                }
                Metric::Chebyshev => {
                    let d = dx.abs().max(dz.abs());
                    if d > r {
                        continue;
                    }
                    d
                }
            };
            f(iz * stroke.vertex_width + ix, falloff_weight(d, r));
        }
    }
}

/// Average, minimum, and maximum of the clamped 3x3 neighborhood around
/// vertex (ix, iz) in `heights`.
pub fn neighborhood(
    heights: &[f32],
    vertex_width: usize,
    vertex_length: usize,
    ix: usize,
    iz: usize,
) -> (f32, f32, f32) {
    let x0 = ix.saturating_sub(1);
    let x1 = (ix + 1).min(vertex_width - 1);
    let z0 = iz.saturating_sub(1);
    let z1 = (iz + 1).min(vertex_length - 1);

    let mut sum = 0.0;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut count = 0;
    for z in z0..=z1 {
        for x in x0..=x1 {
            let h = heights[z * vertex_width + x];
            sum += h;
            min = min.min(h);
            max = max.max(h);
            count += 1;
        }
    }
    (sum / count as f32, min, max)
}
