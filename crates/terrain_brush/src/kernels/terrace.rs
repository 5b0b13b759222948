//! Terrace: quantize heights to a step size.

use crate::brush::Brush;
use crate::falloff::{visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

/// Fallback step size when the stroke's strength is not usable as one.
const DEFAULT_STEP: f32 = 8.0;

/// Snaps heights to multiples of a step. Unlike the blend brushes, strength
/// here is the step size in world units; the only blending is the falloff
/// itself, so repeated passes converge instead of compounding.
pub struct TerraceBrush;

impl Brush for TerraceBrush {
    fn id(&self) -> &str {
        "terrace"
    }

    fn label(&self) -> &str {
        "Terrace"
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        let step = if stroke.strength > 0.0 {
            stroke.strength
        } else {
            DEFAULT_STEP
        };
        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let h = stroke.heights[idx];
            let snapped = (h / step).round() * step;
            out[idx] = h + (snapped - h) * w;
        });
        out
    }
}
