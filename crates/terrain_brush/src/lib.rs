//! Interactive terrain brushes.
//!
//! This crate provides:
//! - The [`Brush`] trait and a deterministic [`BrushRegistry`] with
//!   schema-validated dispatch
//! - The built-in kernel library (raise/lower, smooth/blend,
//!   flatten/level/fill/drain, erode/dilate, terrace, noise, sharpen,
//!   square-footprint variants)
//! - Declarative parameter schemas for host UIs
//! - The image-stamp sampler and its poll-based raster cache
//!
//! Every brush application is a pure function returning a fresh height
//! array; hosts detect change by reference identity and keep the previous
//! array for free.

pub mod brush;
pub mod falloff;
pub mod kernels;
pub mod params;
pub mod registry;
pub mod stamp;
pub mod stroke;

pub use brush::Brush;
pub use falloff::{falloff_weight, neighborhood, smoothstep, visit_cells, Metric};
pub use kernels::{
    DeltaBrush, FlattenBrush, MorphBrush, NoiseBrush, SharpenBrush, SmoothBrush, TerraceBrush,
};
pub use params::{resolve_params, ParamDef, ParamSet, ParamValue, ResolvedParams};
pub use registry::{resolve_legacy_mode, BrushRegistry};
pub use stamp::{DecodeCache, MemoryStore, Raster, RasterLoader, RasterStore, StampBrush, Tiling};
pub use stroke::BrushStroke;
