//! Brush registry and dispatch.
//!
//! The registry is an explicit instance the host constructs at startup —
//! built-ins come from a static list and extensions from further
//! [`BrushRegistry::register`] calls, so its contents are deterministic and
//! testable. There is no ambient module scanning.

use std::sync::Arc;

use log::{debug, warn};

use crate::brush::Brush;
use crate::kernels::{
    DeltaBrush, FlattenBrush, MorphBrush, NoiseBrush, SharpenBrush, SmoothBrush, TerraceBrush,
};
use crate::params::resolve_params;
use crate::stamp::{RasterStore, StampBrush};
use crate::stroke::BrushStroke;

/// Ordered brush lookup table.
#[derive(Default)]
pub struct BrushRegistry {
    brushes: Vec<Arc<dyn Brush>>,
}

impl BrushRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every built-in brush. The stamp brush
    /// polls `rasters` for its images.
    pub fn with_builtin(rasters: Arc<dyn RasterStore>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DeltaBrush::raise()));
        registry.register(Arc::new(DeltaBrush::lower()));
        registry.register(Arc::new(DeltaBrush::raise_square()));
        registry.register(Arc::new(DeltaBrush::lower_square()));
        registry.register(Arc::new(SmoothBrush::smooth()));
        registry.register(Arc::new(SmoothBrush::blend()));
        registry.register(Arc::new(FlattenBrush::flatten()));
        registry.register(Arc::new(FlattenBrush::level()));
        registry.register(Arc::new(FlattenBrush::fill()));
        registry.register(Arc::new(FlattenBrush::drain()));
        registry.register(Arc::new(MorphBrush::erode()));
        registry.register(Arc::new(MorphBrush::dilate()));
        registry.register(Arc::new(TerraceBrush));
        registry.register(Arc::new(NoiseBrush));
        registry.register(Arc::new(SharpenBrush));
        registry.register(Arc::new(StampBrush::new(rasters)));
        registry
    }

    /// Register a brush. Last writer wins: re-registering an id replaces
    /// the existing brush in place (keeping its list position) and logs a
    /// collision warning. Never fatal.
    pub fn register(&mut self, brush: Arc<dyn Brush>) {
        match self.brushes.iter().position(|b| b.id() == brush.id()) {
            Some(index) => {
                warn!("brush id '{}' registered twice, replacing", brush.id());
                self.brushes[index] = brush;
            }
            None => self.brushes.push(brush),
        }
    }

    /// Look up a brush by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Brush>> {
        self.brushes.iter().find(|b| b.id() == id).cloned()
    }

    /// Whether a brush id is registered.
    pub fn exists(&self, id: &str) -> bool {
        self.brushes.iter().any(|b| b.id() == id)
    }

    /// All registered brushes in registration order.
    pub fn list(&self) -> &[Arc<dyn Brush>] {
        &self.brushes
    }

    /// Apply a brush by id, validating the stroke's params against the
    /// brush's schema first. An unknown id is a silent no-op: the input
    /// heights come back as an unchanged copy.
    pub fn dispatch(&self, id: &str, stroke: &BrushStroke) -> Vec<f32> {
        match self.get(id) {
            Some(brush) => {
                let params = resolve_params(brush.param_defs(), &stroke.params);
                brush.apply(stroke, &params)
            }
            None => {
                debug!("unknown brush id '{}', stroke ignored", id);
                stroke.heights.to_vec()
            }
        }
    }

    /// Serialized control schema for a brush, for host UIs.
    pub fn param_schema_json(&self, id: &str) -> Option<serde_json::Value> {
        self.get(id).map(|brush| {
            serde_json::json!({
                "id": brush.id(),
                "label": brush.label(),
                "params": serde_json::to_value(brush.param_defs())
                    .unwrap_or(serde_json::Value::Null),
            })
        })
    }
}

/// Map the legacy stroke modes onto brush ids.
///
/// Old hosts speak `"add"`/`"remove"`; the mapping lives here at the UI
/// boundary, not inside the registry, so registered ids stay canonical.
pub fn resolve_legacy_mode(mode: &str) -> &str {
    match mode {
        "add" => "raise",
        "remove" => "lower",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamSet, ResolvedParams};
    use crate::stamp::MemoryStore;

    fn builtin() -> BrushRegistry {
        BrushRegistry::with_builtin(Arc::new(MemoryStore::new()))
    }

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
    fn test_builtin_set_is_complete() {
        let registry = builtin();
        for id in [
            "raise",
            "lower",
            "raise-square",
            "lower-square",
            "smooth",
            "blend",
            "flatten",
            "level",
            "fill",
            "drain",
            "erode",
            "dilate",
            "terrace",
            "noise",
            "sharpen",
            "stamp",
        ] {
            assert!(registry.exists(id), "missing builtin '{}'", id);
        }
        assert_eq!(registry.list().len(), 16);
    }

    #[test]
    fn test_dispatch_unknown_id_returns_unchanged_copy() {
        let registry = builtin();
        let heights = vec![7.0; 25];
        let s = stroke(&heights);
        let out = registry.dispatch("no-such-brush", &s);
        assert_eq!(out, heights);
        assert_ne!(out.as_ptr(), heights.as_ptr());
    }

    #[test]
    fn test_dispatch_applies_brush() {
        let registry = builtin();
        let heights = vec![0.0; 25];
        let s = stroke(&heights);
        let out = registry.dispatch("raise", &s);
        assert_eq!(out[12], 10.0);
    }

    struct NamedNoop(&'static str, &'static str);

    impl Brush for NamedNoop {
        fn id(&self) -> &str {
            self.0
        }

        fn label(&self) -> &str {
            self.1
        }

        fn apply(&self, stroke: &BrushStroke, _params: &ResolvedParams) -> Vec<f32> {
            stroke.heights.to_vec()
        }
    }

    #[test]
    fn test_register_collision_last_writer_wins() {
        let mut registry = BrushRegistry::new();
        registry.register(Arc::new(NamedNoop("x", "First")));
        registry.register(Arc::new(NamedNoop("y", "Other")));
        registry.register(Arc::new(NamedNoop("x", "Second")));

        assert_eq!(registry.list().len(), 2);
        assert_eq!(registry.get("x").unwrap().label(), "Second");
        // Replacement keeps the original position.
        assert_eq!(registry.list()[0].id(), "x");
    }

    #[test]
    fn test_legacy_mode_aliases() {
        assert_eq!(resolve_legacy_mode("add"), "raise");
        assert_eq!(resolve_legacy_mode("remove"), "lower");
        assert_eq!(resolve_legacy_mode("terrace"), "terrace");
    }

    #[test]
    fn test_param_schema_json() {
        let registry = builtin();
        let schema = registry.param_schema_json("stamp").unwrap();
        assert_eq!(schema["id"], "stamp");
        assert_eq!(schema["params"][0]["name"], "image");
        assert!(registry.param_schema_json("raise").unwrap()["params"]
            .as_array()
            .unwrap()
            .is_empty());
        assert!(registry.param_schema_json("missing").is_none());
    }

    #[test]
    fn test_every_builtin_is_pure_and_total() {
        // Each builtin: never mutates its input, returns a fresh array,
        // and survives a degenerate stroke as a no-op.
        let registry = builtin();
        let heights: Vec<f32> = (0..25).map(|i| (i as f32 * 3.7) % 11.0).collect();
        let before = heights.clone();

        for brush in registry.list() {
            let s = stroke(&heights);
            let out = registry.dispatch(brush.id(), &s);
            assert_eq!(heights, before, "brush '{}' mutated its input", brush.id());
            assert_eq!(out.len(), heights.len());

            let mut degenerate = stroke(&heights);
            degenerate.radius = -1.0;
            let out = registry.dispatch(brush.id(), &degenerate);
            assert_eq!(out, heights, "brush '{}' not a no-op", brush.id());
        }
    }
}
