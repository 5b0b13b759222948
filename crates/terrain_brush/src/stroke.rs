//! Stroke arguments shared by every brush.
//!
//! A [`BrushStroke`] bundles the current heightfield state with one
//! pointer-event's worth of world-space stroke data. The grid is centered on
//! the world origin: vertex `(ix, iz)` sits at
//! `(ix * step_x - world_width/2, iz * step_z - world_length/2)` where
//! `step = world / (vertices - 1)`.

use terrain_core::HeightfieldGrid;

use crate::params::ParamSet;

/// Arguments for one brush application.
///
/// `heights` is borrowed and never mutated; brushes return a fresh array so
/// hosts can treat reference identity as a change signal.
#[derive(Clone, Debug)]
pub struct BrushStroke<'a> {
    /// Current height samples, row-major, `vertex_width * vertex_length`.
    pub heights: &'a [f32],
    /// Vertices per row.
    pub vertex_width: usize,
    /// Vertices per column.
    pub vertex_length: usize,
    /// World extent along x.
    pub world_width: f32,
    /// World extent along z.
    pub world_length: f32,
    /// Stroke center, world-space x.
    pub center_x: f32,
    /// Stroke center, world-space z.
    pub center_z: f32,
    /// World-space brush radius.
    pub radius: f32,
    /// Brush-defined strength; its meaning varies per brush and is part of
    /// each brush's contract.
    pub strength: f32,
    /// Surface height under the cursor, when the host has it. Several
    /// brushes use this as the target elevation.
    pub hit_y: Option<f32>,
    /// Free-form per-brush parameters, validated against the brush's
    /// schema at dispatch time.
    pub params: ParamSet,
}

impl<'a> BrushStroke<'a> {
    /// Build a stroke over a [`HeightfieldGrid`]'s current float heights.
    pub fn for_grid(
        grid: &'a HeightfieldGrid,
        center_x: f32,
        center_z: f32,
        radius: f32,
        strength: f32,
    ) -> Self {
        let (world_width, world_length) = grid.world_size();
        Self {
            heights: &grid.heights,
            vertex_width: grid.vertex_width(),
            vertex_length: grid.vertex_length(),
            world_width,
            world_length,
            center_x,
            center_z,
            radius,
            strength,
            hit_y: None,
            params: ParamSet::new(),
        }
    }

    /// World units between adjacent vertices along x.
    pub fn step_x(&self) -> f32 {
        self.world_width / (self.vertex_width - 1) as f32
    }

    /// World units between adjacent vertices along z.
    pub fn step_z(&self) -> f32 {
        self.world_length / (self.vertex_length - 1) as f32
    }

    /// World position of vertex (ix, iz).
    pub fn vertex_world(&self, ix: usize, iz: usize) -> (f32, f32) {
        (
            ix as f32 * self.step_x() - self.world_width / 2.0,
            iz as f32 * self.step_z() - self.world_length / 2.0,
        )
    }

    /// Grid vertex nearest to a world position, clamped to the grid.
    pub fn nearest_vertex(&self, x: f32, z: f32) -> (usize, usize) {
        let ix = ((x + self.world_width / 2.0) / self.step_x()).round();
        let iz = ((z + self.world_length / 2.0) / self.step_z()).round();
        (
            (ix.max(0.0) as usize).min(self.vertex_width - 1),
            (iz.max(0.0) as usize).min(self.vertex_length - 1),
        )
    }

    /// Height at vertex (ix, iz), or 0.0 out of bounds.
    pub fn height_at(&self, ix: usize, iz: usize) -> f32 {
        if ix < self.vertex_width && iz < self.vertex_length {
            self.heights[iz * self.vertex_width + ix]
        } else {
            0.0
        }
    }

    /// True when the stroke cannot meaningfully edit anything: a grid
    /// smaller than 2x2 vertices, a non-positive or non-finite radius, or a
    /// heights array that does not match the stated dimensions. Brushes
    /// treat degenerate strokes as no-ops, never as errors.
    pub fn is_degenerate(&self) -> bool {
        self.vertex_width < 2
            || self.vertex_length < 2
            || !(self.radius > 0.0)
            || !self.radius.is_finite()
            || self.heights.len() != self.vertex_width * self.vertex_length
    }
}
