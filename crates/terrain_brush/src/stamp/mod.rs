//! Image stamp: sample a grayscale raster into the heightfield.

mod cache;
mod raster;

pub use cache::{DecodeCache, MemoryStore, RasterLoader, RasterStore};
pub use raster::{Raster, Tiling};

use std::sync::Arc;

use crate::brush::Brush;
use crate::falloff::{visit_cells, Metric};
use crate::params::{ParamDef, ResolvedParams};
use crate::stroke::BrushStroke;

/// Stamps a grayscale image onto the terrain.
///
/// The stroke's local coordinates, rotated by the `rotation` parameter, map
/// into image UV space as `u = 0.5 + (xr / (2 * radius)) * uv_scale` (and
/// likewise for v), so the image spans the brush circle at a UV scale of 1.
/// Strength acts as a blend factor in [0, 1]; `height-scale` carries the
/// world-unit magnitude. In `centered` mode mid-gray is neutral, so one
/// image can both raise and lower.
///
/// The raster is polled from a [`RasterStore`]; until the key resolves the
/// brush is a deterministic no-op (it schedules the load and returns the
/// heights unchanged — it never blocks and never errors).
pub struct StampBrush {
    rasters: Arc<dyn RasterStore>,
    defs: Vec<ParamDef>,
}

impl StampBrush {
    pub fn new(rasters: Arc<dyn RasterStore>) -> Self {
        let defs = vec![
            ParamDef::text("image", "Image", ""),
            ParamDef::number("rotation", "Rotation", 0.0, -360.0, 360.0, 1.0),
            ParamDef::number("uv-scale", "UV Scale", 1.0, 0.05, 16.0, 0.05),
            ParamDef::select("tiling", "Tiling", &["clamp", "repeat"], "clamp"),
            ParamDef::boolean("centered", "Centered", false),
            ParamDef::number("height-scale", "Height Scale", 10.0, -1000.0, 1000.0, 0.5),
            ParamDef::boolean("falloff", "Falloff", true),
            ParamDef::number("falloff-power", "Falloff Power", 1.0, 0.1, 8.0, 0.1),
        ];
        Self { rasters, defs }
    }
}

impl Brush for StampBrush {
    fn id(&self) -> &str {
        "stamp"
    }

    fn label(&self) -> &str {
        "Image Stamp"
    }

    fn param_defs(&self) -> &[ParamDef] {
        &self.defs
    }

    fn apply(&self, stroke: &BrushStroke, params: &ResolvedParams) -> Vec<f32> {
        let mut out = stroke.heights.to_vec();

        let key = params.text("image");
        if key.is_empty() {
            return out;
        }
        self.rasters.ensure_loading(key);
        let Some(raster) = self.rasters.try_get(key) else {
            return out;
        };

        let angle = (params.number("rotation") as f32).to_radians();
        let (sin, cos) = angle.sin_cos();
        let uv_scale = params.number("uv-scale") as f32;
        let tiling = Tiling::from_name(params.text("tiling"));
        let centered = params.boolean("centered");
        let height_scale = params.number("height-scale") as f32;
        let use_falloff = params.boolean("falloff");
        let falloff_power = params.number("falloff-power") as f32;
        let blend = stroke.strength.clamp(0.0, 1.0);

        visit_cells(stroke, Metric::Euclidean, |idx, w| {
            let ix = idx % stroke.vertex_width;
            let iz = idx / stroke.vertex_width;
            let (wx, wz) = stroke.vertex_world(ix, iz);
            let dx = wx - stroke.center_x;
            let dz = wz - stroke.center_z;
            let xr = dx * cos - dz * sin;
            let zr = dx * sin + dz * cos;

            let u = 0.5 + (xr / (2.0 * stroke.radius)) * uv_scale;
            let v = 0.5 + (zr / (2.0 * stroke.radius)) * uv_scale;
            let lum = raster.sample_bilinear(u, v, tiling);
            let stamp = if centered { lum - 0.5 } else { lum };

            let shape = if use_falloff { w.powf(falloff_power) } else { 1.0 };
            out[idx] += stamp * height_scale * blend * shape;
        });
        out
    }
}
