//! Sharpen: unsharp mask over the heightfield.

use crate::brush::Brush;
use crate::falloff::{neighborhood, visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

/// Exaggerates local relief by adding back the difference between each
/// vertex and its 3x3 average. Strength is the mask amount in [0, 1],
/// scaled by falloff.
pub struct SharpenBrush;

impl Brush for SharpenBrush {
    fn id(&self) -> &str {
        "sharpen"
    }

    fn label(&self) -> &str {
        "Sharpen"
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        let amount = stroke.strength.clamp(0.0, 1.0);
        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let ix = idx % stroke.vertex_width;
            let iz = idx / stroke.vertex_width;
            let (avg, _, _) = neighborhood(
                stroke.heights,
                stroke.vertex_width,
                stroke.vertex_length,
                ix,
                iz,
            );
            let h = stroke.heights[idx];
            out[idx] = h + (h - avg) * amount * w;
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    fn stroke(heights: &[f32]) -> BrushStroke<'_> {
        BrushStroke {
            heights,
            vertex_width: 5,
            vertex_length: 5,
            world_width: 40.0,
            world_length: 40.0,
            center_x: 0.0,
            center_z: 0.0,
            radius: 25.0,
            strength: 1.0,
            hit_y: None,
            params: ParamSet::new(),
        }
    }

    #[test]
    fn test_sharpen_exaggerates_a_spike() {
        let mut heights = vec![0.0; 25];
        heights[12] = 9.0;
        let out = SharpenBrush.apply(&stroke(&heights), &ResolvedParams::default());
        // avg3x3 at the spike is 1.0, so the spike grows by (9-1).
        assert!((out[12] - 17.0).abs() < 1e-4, "got {}", out[12]);
        // Flat neighbors of the spike dip below zero (their average rose).
        assert!(out[11] < 0.0);
    }

    #[test]
    fn test_sharpen_flat_region_unchanged() {
        let heights = vec![3.0; 25];
        let out = SharpenBrush.apply(&stroke(&heights), &ResolvedParams::default());
        assert_eq!(out, heights);
    }
}
