//! Flatten family: blend toward a target elevation.
//!
//! The target comes from the stroke's `hit_y` (surface height under the
//! cursor) when the host supplies it, else from the height at the grid
//! vertex nearest the stroke center.

use crate::brush::Brush;
use crate::falloff::{visit_cells, Metric};
use crate::params::ResolvedParams;
use crate::stroke::BrushStroke;

#[derive(Clone, Copy, PartialEq, Eq)]
enum TargetClamp {
    /// Blend toward the target from either side.
    None,
    /// `fill`: per-cell target is `max(h, T)` — never lowers terrain.
    NeverLower,
    /// `drain`: per-cell target is `min(h, T)` — never raises terrain.
    NeverRaise,
}

/// Blends heights toward a target elevation. Strength is the blend factor
/// in [0, 1], scaled by falloff; `level` treats a non-positive strength as
/// a full-strength hard set.
pub struct FlattenBrush {
    id: &'static str,
    label: &'static str,
    clamp: TargetClamp,
    /// Non-positive strength means "blend fully" instead of "no effect".
    full_by_default: bool,
}

impl FlattenBrush {
    pub fn flatten() -> Self {
        Self {
            id: "flatten",
            label: "Flatten",
            clamp: TargetClamp::None,
            full_by_default: false,
        }
    }

    pub fn level() -> Self {
        Self {
            id: "level",
            label: "Level",
            clamp: TargetClamp::None,
            full_by_default: true,
        }
    }

    pub fn fill() -> Self {
        Self {
            id: "fill",
            label: "Fill",
            clamp: TargetClamp::NeverLower,
            full_by_default: false,
        }
    }

    pub fn drain() -> Self {
        Self {
            id: "drain",
            label: "Drain",
            clamp: TargetClamp::NeverRaise,
            full_by_default: false,
        }
    }
}

impl Brush for FlattenBrush {
    fn id(&self) -> &str {
        self.id
    }

    fn label(&self) -> &str {
        self.label
    }

    fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();
        if stroke.is_degenerate() {
            return out;
        }

        let blend = if self.full_by_default && stroke.strength <= 0.0 {
            1.0
        } else {
            stroke.strength.clamp(0.0, 1.0)
        };

        let target = stroke.hit_y.unwrap_or_else(|| {
            let (ix, iz) = stroke.nearest_vertex(stroke.center_x, stroke.center_z);
            stroke.height_at(ix, iz)
        });

        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let h = stroke.heights[idx];
            let t = match self.clamp {
                TargetClamp::None => target,
                TargetClamp::NeverLower => target.max(h),
                TargetClamp::NeverRaise => target.min(h),
            };
            out[idx] = h + (t - h) * blend * w;
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    fn ramp_stroke(heights: &[f32]) -> BrushStroke<'_> {
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

    fn ramp() -> Vec<f32> {
        (0..25).map(|i| i as f32).collect()
    }

    #[test]
    fn test_flatten_uses_hit_y_as_target() {
        let heights = ramp();
        let mut stroke = ramp_stroke(&heights);
        stroke.hit_y = Some(100.0);
        let out = FlattenBrush::flatten().apply(&stroke, &ResolvedParams::default());
        // Center vertex hits the target exactly at full strength.
        assert_eq!(out[12], 100.0);
    }

    #[test]
    fn test_flatten_falls_back_to_center_vertex_height() {
        let heights = ramp();
        let out = FlattenBrush::flatten().apply(&ramp_stroke(&heights), &ResolvedParams::default());
        // Target is the center vertex's own height (12.0).
        assert_eq!(out[12], 12.0);
        // A neighbor inside the radius moved toward 12, not past it.
        assert!(out[11] > 11.0 && out[11] < 12.0);
        assert!(out[13] < 13.0 && out[13] > 12.0);
    }

    #[test]
    fn test_level_hard_sets_when_strength_is_zero() {
        let heights = ramp();
        let mut stroke = ramp_stroke(&heights);
        stroke.strength = 0.0;
        stroke.hit_y = Some(5.0);
        let out = FlattenBrush::level().apply(&stroke, &ResolvedParams::default());
        assert_eq!(out[12], 5.0);

        // flatten with zero strength is a no-op instead.
        let out = FlattenBrush::flatten().apply(&stroke, &ResolvedParams::default());
        assert_eq!(out, heights);
    }

    #[test]
    fn test_fill_never_lowers() {
        let heights = ramp();
        let mut stroke = ramp_stroke(&heights);
        stroke.hit_y = Some(12.0);
        let out = FlattenBrush::fill().apply(&stroke, &ResolvedParams::default());
        for (i, (&before, &after)) in heights.iter().zip(out.iter()).enumerate() {
            assert!(after >= before - 1e-6, "vertex {} lowered", i);
        }
        // Low cells inside the radius did rise toward the target.
        assert!(out[11] > heights[11]);
        // Cells already above the target are untouched.
        assert_eq!(out[13], heights[13]);
    }

    #[test]
    fn test_drain_never_raises() {
        let heights = ramp();
        let mut stroke = ramp_stroke(&heights);
        stroke.hit_y = Some(12.0);
        let out = FlattenBrush::drain().apply(&stroke, &ResolvedParams::default());
        for (&before, &after) in heights.iter().zip(out.iter()) {
            assert!(after <= before + 1e-6);
        }
        assert!(out[13] < heights[13]);
        assert_eq!(out[11], heights[11]);
    }
}
