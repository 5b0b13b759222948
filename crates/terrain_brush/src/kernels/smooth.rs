//! Smooth/blend: pull each vertex toward its 3x3 neighborhood average.

use crate::brush::Brush;
use crate::falloff::{neighborhood, visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

/// Blends heights toward the local average. Strength is the blend factor in
/// [0, 1], scaled by falloff. `blend` is the same operation run twice back
/// to back, the second pass reading the first pass's output.
pub struct SmoothBrush {
    id: &'static str,
    label: &'static str,
    passes: u32,
}

impl SmoothBrush {
    pub fn smooth() -> Self {
        Self {
            id: "smooth",
            label: "Smooth",
            passes: 1,
        }
    }

    pub fn blend() -> Self {
        Self {
            id: "blend",
            label: "Blend",
            passes: 2,
        }
    }
}

fn smooth_pass(source: &[f32], stroke: &BrushStroke, blend: f32) -> Vec<f32> {
    let mut out = source.to_vec();
    visit_cells(stroke, Metric::Euclidean, |idx, w| {
        let ix = idx % stroke.vertex_width;
        let iz = idx / stroke.vertex_width;
        let (avg, _, _) = neighborhood(source, stroke.vertex_width, stroke.vertex_length, ix, iz);
        out[idx] = source[idx] + (avg - source[idx]) * blend * w;
    });
    out
}

impl Brush for SmoothBrush {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let blend = stroke.strength.clamp(0.0, 1.0);
        let mut out = smooth_pass(stroke.heights, stroke, blend);
        for _ in 1..self.passes {
            out = smooth_pass(&out, stroke, blend);
        }
        out
    }
}
