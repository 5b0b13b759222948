//! Raise/lower: add a falloff-weighted world-unit delta.

use crate::brush::Brush;
use crate::falloff::{visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

/// Raises or lowers terrain by `|strength| * falloff` world units, with
/// either a circular or a square footprint.
pub struct DeltaBrush {
    id: &'static str,
    label: &'static str,
    sign: f32,
    metric: Metric,
}

impl DeltaBrush {
    pub fn raise() -> Self {
        Self {
            id: "raise",
            label: "Raise",
            sign: 1.0,
            metric: Metric::Euclidean,
        }
    }

    pub fn lower() -> Self {
        Self {
            id: "lower",
            label: "Lower",
            sign: -1.0,
            metric: Metric::Euclidean,
        }
    }

    pub fn raise_square() -> Self {
        Self {
            id: "raise-square",
            label: "Raise (Square)",
            sign: 1.0,
            metric: Metric::Chebyshev,
        }
    }

    pub fn lower_square() -> Self {
        Self {
            id: "lower-square",
            label: "Lower (Square)",
            sign: -1.0,
            metric: Metric::Chebyshev,
        }
    }
}

impl Brush for DeltaBrush {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        let delta = stroke.strength.abs() * self.sign;
        visit_cells(stroke, self.metric, |idx, w| {
            out[idx] += delta * w;
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    /// Flat 5x5 grid over a 40x40 world (vertex spacing 10).
    fn stroke(heights: &[f32]) -> BrushStroke<'_> {
        BrushStroke {
            heights,
            vertex_width: 5,
            vertex_length: 5,
            world_width: 40.0,
            world_length: 40.0,
            center_x: 0.0,
            center_z: 0.0,
            radius: 15.0,
            strength: 10.0,
            hit_y: None,
            params: ParamSet::new(),
        }
    }

    #[test]
    fn test_raise_center_by_exact_strength() {
        let heights = vec![0.0; 25];
        let out = DeltaBrush::raise().apply(&stroke(&heights), &ResolvedParams::default());

        // Center vertex (distance 0) rises by exactly the strength.
        assert_eq!(out[12], 10.0);
        // Distance 10 neighbors get strength * smoothstep(1/3).
        let expected = 10.0 * (7.0 / 27.0);
        assert!((out[11] - expected).abs() < 1e-5, "got {}", out[11]);
        // Distance 20 vertices are beyond the radius and untouched.
        assert_eq!(out[10], 0.0);
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn test_lower_is_negative_regardless_of_strength_sign() {
        let heights = vec![5.0; 25];
        let mut s = stroke(&heights);
        s.strength = -10.0;
        let out = DeltaBrush::lower().apply(&s, &ResolvedParams::default());
        assert_eq!(out[12], -5.0);
    }

    #[test]
    fn test_square_variant_reaches_diagonals() {
        let heights = vec![0.0; 25];
        let round = DeltaBrush::raise().apply(&stroke(&heights), &ResolvedParams::default());
        let square =
            DeltaBrush::raise_square().apply(&stroke(&heights), &ResolvedParams::default());

        // Diagonal neighbors sit at Euclidean ~14.1 but Chebyshev 10.
        assert!(round[6] > 0.0); // still inside euclidean radius 15
        assert!(square[6] > round[6]); // but the square brush weights them higher
        let expected = 10.0 * (7.0 / 27.0); // chebyshev distance 10
        assert!((square[6] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_apply_is_pure() {
        let heights = vec![1.0; 25];
        let s = stroke(&heights);
        let before = heights.clone();
        let out = DeltaBrush::raise().apply(&s, &ResolvedParams::default());
        assert_eq!(heights, before);
        assert_ne!(out.as_ptr(), heights.as_ptr());
    }

    #[test]
    fn test_degenerate_radius_returns_unchanged_copy() {
        let heights = vec![3.0; 25];
        let mut s = stroke(&heights);
        s.radius = 0.0;
        let out = DeltaBrush::raise().apply(&s, &ResolvedParams::default());
        assert_eq!(out, heights);
    }
}
