//! Heightfield grid: the canonical in-memory terrain data model.
//!
//! A `width x length` grid of *squares* has `(width+1) x (length+1)` height
//! *vertices*. [`HeightfieldGrid`] stores one sample per vertex (row-major,
//! z-major) both as the raw quantized `u16` values from the file and as
//! eagerly decoded `f32` world-unit heights, together with the world-scale
//! metadata needed to place vertices in world space.
//!
//! # Downsampling
//!
//! Native maps can be far larger than an interactive editor wants to mesh.
//! [`HeightfieldGrid::downsample`] produces a strided nearest subsample (no
//! filtering), so every edit-resolution vertex corresponds to exactly one
//! native vertex and edited values can be written back without ambiguity via
//! [`DownsampledView::write_back`].

/// Maximum mesh segments per side the editor is expected to handle.
pub const DEFAULT_SEGMENT_CEILING: usize = 512;

/// Decode a quantized sample into a world-unit height.
pub fn dequantize(raw: u16, min_height: f32, max_height: f32) -> f32 {
    min_height + raw as f32 * (max_height - min_height) / 65535.0
}

/// Quantize a world-unit height into the u16 range used on disk.
///
/// Clamps to [0, 65535]. A degenerate range (`max <= min`) quantizes
/// everything to 0, which decodes back to `min`.
pub fn quantize(height: f32, min_height: f32, max_height: f32) -> u16 {
    let range = max_height - min_height;
    if range <= 0.0 {
        return 0;
    }
    let scaled = ((height - min_height) * 65535.0 / range).round();
    scaled.clamp(0.0, 65535.0) as u16
}

/// Pick the subsample stride that brings `max_segment_dim` under `ceiling`.
///
/// Returns at least 1; a grid already under the ceiling is left at native
/// resolution.
pub fn choose_stride(max_segment_dim: usize, ceiling: usize) -> usize {
    if ceiling == 0 {
        return 1;
    }
    max_segment_dim.div_ceil(ceiling).max(1)
}

/// Dense row-major heightfield with world-scale metadata.
///
/// Invariant: `heights.len() == heights_u16.len() == (width+1)*(length+1)`.
/// The codec validates this before constructing a grid; violated lengths are
/// a hard decode error upstream.
#[derive(Clone, Debug)]
pub struct HeightfieldGrid {
    /// Grid width in squares (vertices per row = width + 1).
    pub width: i32,
    /// Grid length in squares (vertices per column = length + 1).
    pub length: i32,
    /// World units per square edge.
    pub square_size: i32,
    /// Lower quantization bound in world units.
    pub min_height: f32,
    /// Upper quantization bound in world units.
    pub max_height: f32,
    /// Raw quantized samples as stored on disk.
    pub heights_u16: Vec<u16>,
    /// Decoded world-unit heights, kept in sync with `heights_u16` at
    /// construction / reprojection time. Brush edits replace this array
    /// wholesale; the u16 samples are only re-derived when saving.
    pub heights: Vec<f32>,
}

impl HeightfieldGrid {
    /// Build a grid from raw quantized samples, decoding floats eagerly.
    pub fn from_quantized(
        width: i32,
        length: i32,
        square_size: i32,
        min_height: f32,
        max_height: f32,
        heights_u16: Vec<u16>,
    ) -> Self {
        let heights = heights_u16
            .iter()
            .map(|&raw| dequantize(raw, min_height, max_height))
            .collect();
        Self {
            width,
            length,
            square_size,
            min_height,
            max_height,
            heights_u16,
            heights,
        }
    }

    /// Vertices per row.
    pub fn vertex_width(&self) -> usize {
        self.width as usize + 1
    }

    /// Vertices per column.
    pub fn vertex_length(&self) -> usize {
        self.length as usize + 1
    }

    /// Total vertex count, `(width+1) * (length+1)`.
    pub fn vertex_count(&self) -> usize {
        self.vertex_width() * self.vertex_length()
    }

    /// World extent `(width * square_size, length * square_size)`.
    pub fn world_size(&self) -> (f32, f32) {
        (
            (self.width * self.square_size) as f32,
            (self.length * self.square_size) as f32,
        )
    }

    /// Height at vertex (x, z), or 0.0 if out of bounds.
    pub fn at(&self, x: usize, z: usize) -> f32 {
        if x < self.vertex_width() && z < self.vertex_length() {
            self.heights[z * self.vertex_width() + x]
        } else {
            0.0
        }
    }

    /// Re-derive float heights from the raw u16 samples under new bounds.
    ///
    /// Used when authoritative min/max come from map metadata rather than
    /// the file header. Idempotent for a given (min, max) pair.
    pub fn reproject(&mut self, min_height: f32, max_height: f32) {
        self.min_height = min_height;
        self.max_height = max_height;
        for (out, &raw) in self.heights.iter_mut().zip(self.heights_u16.iter()) {
            *out = dequantize(raw, min_height, max_height);
        }
    }

    /// Stride that keeps this grid's mesh under [`DEFAULT_SEGMENT_CEILING`]
    /// segments per side.
    pub fn edit_stride(&self) -> usize {
        choose_stride(
            self.width.max(self.length).max(0) as usize,
            DEFAULT_SEGMENT_CEILING,
        )
    }

    /// Strided nearest subsample for editing/display.
    ///
    /// Output vertex (x, z) takes the value of native vertex
    /// `(x*stride, z*stride)`. A stride of 1 (or 0, treated as 1) copies the
    /// grid at native resolution.
    pub fn downsample(&self, stride: usize) -> DownsampledView {
        let stride = stride.max(1);
        let native_w = self.vertex_width();
        let native_l = self.vertex_length();
        let out_width = (native_w - 1) / stride + 1;
        let out_length = (native_l - 1) / stride + 1;

        let mut heights = Vec::with_capacity(out_width * out_length);
        for z in 0..out_length {
            for x in 0..out_width {
                heights.push(self.heights[z * stride * native_w + x * stride]);
            }
        }

        DownsampledView {
            stride,
            out_width,
            out_length,
            native_vertex_width: native_w,
            heights,
        }
    }
}

/// A strided subsample of a [`HeightfieldGrid`], plus the index mapping back
/// to native resolution.
#[derive(Clone, Debug)]
pub struct DownsampledView {
    /// Native vertices skipped per output vertex along each axis.
    pub stride: usize,
    /// Output vertices per row.
    pub out_width: usize,
    /// Output vertices per column.
    pub out_length: usize,
    /// Vertices per row of the source grid.
    pub native_vertex_width: usize,
    /// Subsampled heights, row-major.
    pub heights: Vec<f32>,
}

impl DownsampledView {
    /// Flat index into the native height array for output vertex (x, z).
    pub fn source_index(&self, x: usize, z: usize) -> usize {
        z * self.stride * self.native_vertex_width + x * self.stride
    }

    /// Scatter this view's (possibly edited) heights back into the native
    /// array, touching only the vertices the subsample was taken from.
    pub fn write_back(&self, native: &mut [f32]) {
        for z in 0..self.out_length {
            for x in 0..self.out_width {
                native[self.source_index(x, z)] = self.heights[z * self.out_width + x];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_grid(width: i32, length: i32) -> HeightfieldGrid {
        let count = (width as usize + 1) * (length as usize + 1);
        let raw: Vec<u16> = (0..count).map(|i| (i * 7 % 65536) as u16).collect();
        HeightfieldGrid::from_quantized(width, length, 8, 0.0, 100.0, raw)
    }

    #[test]
    fn test_quantize_roundtrip_within_half_step() {
        let (min, max) = (-50.0, 150.0);
        let half_step = (max - min) / 65535.0 / 2.0;
        for &h in &[-50.0, -12.34, 0.0, 99.99, 150.0] {
            let raw = quantize(h, min, max);
            let back = dequantize(raw, min, max);
            assert!(
                (back - h).abs() <= half_step + 1e-4,
                "h={} back={}",
                h,
                back
            );
        }
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-10.0, 0.0, 100.0), 0);
        assert_eq!(quantize(110.0, 0.0, 100.0), 65535);
    }

    #[test]
    fn test_quantize_degenerate_range() {
        assert_eq!(quantize(42.0, 10.0, 10.0), 0);
        assert_eq!(dequantize(0, 10.0, 10.0), 10.0);
    }

    #[test]
    fn test_world_size() {
        let grid = ramp_grid(64, 128);
        assert_eq!(grid.world_size(), (512.0, 1024.0));
        assert_eq!(grid.vertex_count(), 65 * 129);
    }

    #[test]
    fn test_choose_stride() {
        assert_eq!(choose_stride(256, 512), 1);
        assert_eq!(choose_stride(512, 512), 1);
        assert_eq!(choose_stride(513, 512), 2);
        assert_eq!(choose_stride(1024, 512), 2);
        assert_eq!(choose_stride(2048, 512), 4);
        assert_eq!(choose_stride(0, 512), 1);
    }

    #[test]
    fn test_edit_stride_uses_larger_dimension() {
        let grid = ramp_grid(64, 128);
        assert_eq!(grid.edit_stride(), 1);

        let raw = vec![0u16; 1025 * 513];
        let big = HeightfieldGrid::from_quantized(1024, 512, 8, 0.0, 1.0, raw);
        assert_eq!(big.edit_stride(), 2);
    }

    #[test]
    fn test_reproject_idempotent() {
        let mut grid = ramp_grid(4, 4);
        grid.reproject(-10.0, 10.0);
        let once = grid.heights.clone();
        grid.reproject(-10.0, 10.0);
        assert_eq!(once, grid.heights);
        // Raw samples untouched
        assert_eq!(grid.heights_u16[3], 21);
    }

    #[test]
    fn test_downsample_takes_exact_source_vertices() {
        let grid = ramp_grid(8, 8); // 9x9 vertices
        let view = grid.downsample(2);
        assert_eq!(view.out_width, 5);
        assert_eq!(view.out_length, 5);
        for z in 0..view.out_length {
            for x in 0..view.out_width {
                assert_eq!(
                    view.heights[z * view.out_width + x],
                    grid.heights[view.source_index(x, z)]
                );
            }
        }
    }

    #[test]
    fn test_write_back_inverse_mapping() {
        let grid = ramp_grid(8, 8);
        let mut view = grid.downsample(2);
        for h in view.heights.iter_mut() {
            *h += 5.0;
        }

        let mut native = grid.heights.clone();
        view.write_back(&mut native);

        let mut touched = 0;
        for (i, (&before, &after)) in grid.heights.iter().zip(native.iter()).enumerate() {
            let x = i % grid.vertex_width();
            let z = i / grid.vertex_width();
            if x % 2 == 0 && z % 2 == 0 {
                assert_eq!(after, before + 5.0);
                touched += 1;
            } else {
                assert_eq!(after, before);
            }
        }
        assert_eq!(touched, 25);
    }

    #[test]
    fn test_downsample_stride_one_is_identity() {
        let grid = ramp_grid(4, 4);
        let view = grid.downsample(1);
        assert_eq!(view.heights, grid.heights);
    }
}
