//! Erode/dilate: pull heights toward the local 3x3 minimum or maximum.

use crate::brush::Brush;
use crate::falloff::{neighborhood, visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

#[derive(Clone, Copy, PartialEq, Eq)]
enum MorphTarget {
    Min,
    Max,
}

/// Morphological brush: erode blends toward the neighborhood minimum
/// (eating away peaks and edges), dilate toward the maximum (growing
/// plateaus). Strength is the blend factor in [0, 1], scaled by falloff.
pub struct MorphBrush {
    id: &'static str,
    label: &'static str,
    target: MorphTarget,
}

impl MorphBrush {
    pub fn erode() -> Self {
        Self {
            id: "erode",
            label: "Erode",
            target: MorphTarget::Min,
        }
    }

    pub fn dilate() -> Self {
        Self {
            id: "dilate",
            label: "Dilate",
            target: MorphTarget::Max,
        }
    }
}

impl Brush for MorphBrush {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        let blend = stroke.strength.clamp(0.0, 1.0);
        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let ix = idx % stroke.vertex_width;
            let iz = idx / stroke.vertex_width;
            let (_, min, max) = neighborhood(
                stroke.heights,
                stroke.vertex_width,
                stroke.vertex_length,
                ix,
                iz,
            );
            let target = match self.target {
                MorphTarget::Min => min,
                MorphTarget::Max => max,
            };
            let h = stroke.heights[idx];
            out[idx] = h + (target - h) * blend * w;
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
    fn test_erode_levels_a_spike() {
        let mut heights = vec![2.0; 25];
        heights[12] = 10.0;
        let out = MorphBrush::erode().apply(&stroke(&heights), &ResolvedParams::default());
        // Full blend at the center: the spike drops to the local minimum.
        assert_eq!(out[12], 2.0);
    }

    #[test]
    fn test_dilate_fills_a_pit() {
        let mut heights = vec![2.0; 25];
        heights[12] = -6.0;
        let out = MorphBrush::dilate().apply(&stroke(&heights), &ResolvedParams::default());
        assert_eq!(out[12], 2.0);
    }

    #[test]
    fn test_erode_never_raises() {
        let heights: Vec<f32> = (0..25).map(|i| (i % 7) as f32).collect();
        let out = MorphBrush::erode().apply(&stroke(&heights), &ResolvedParams::default());
        for (&before, &after) in heights.iter().zip(out.iter()) {
            assert!(after <= before + 1e-6);
        }
    }

    #[test]
    fn test_dilate_never_lowers() {
        let heights: Vec<f32> = (0..25).map(|i| (i % 7) as f32).collect();
        let out = MorphBrush::dilate().apply(&stroke(&heights), &ResolvedParams::default());
        for (&before, &after) in heights.iter().zip(out.iter()) {
            assert!(after >= before - 1e-6);
        }
    }
}
