//! Noise: add deterministic per-vertex jitter.

use crate::brush::Brush;
use crate::falloff::{visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

/// Adds hash noise in [-1, 1] scaled by strength (the amplitude in world
/// units) and falloff. The seed is derived from the stroke center, so
/// repeated passes over the same spot re-apply the same pattern instead of
/// accumulating random drift.
pub struct NoiseBrush;

/// Deterministic white noise for a grid cell, in [-1, 1].
///
/// LCG parameters from Numerical Recipes, run twice over the mixed seed
/// with an xorshift in between to decorrelate neighboring cells.
fn hash2d(ix: usize, iz: usize, seed: u64) -> f32 {
    let mut state = seed
        .wrapping_add((ix as u64).wrapping_mul(1_664_525))
        .wrapping_add((iz as u64).wrapping_mul(1_013_904_223));
    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    state ^= state >> 16;
    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    ((state >> 40) as f32 / 16_777_215.0) * 2.0 - 1.0
}

fn stroke_seed(stroke: &BrushStroke) -> u64 {
    ((stroke.center_x.to_bits() as u64) << 32) ^ stroke.center_z.to_bits() as u64
}

impl Brush for NoiseBrush {
    fn id(&self) -> &str {
        "noise"
    }

    fn label(&self) -> &str {
        "Noise"
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        let seed = stroke_seed(stroke);
        let amplitude = stroke.strength;
        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let ix = idx % stroke.vertex_width;
            let iz = idx / stroke.vertex_width;
            out[idx] += hash2d(ix, iz, seed) * amplitude * w;
        });
        out
    }
}
