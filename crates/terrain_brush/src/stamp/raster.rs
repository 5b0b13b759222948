//! Grayscale rasters and bilinear sampling.

use image::DynamicImage;

/// Texture addressing outside [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tiling {
    /// Edge texels extend outward.
    Clamp,
    /// The image repeats in both directions.
    Repeat,
}

impl Tiling {
    /// Parse a tiling name; anything unrecognized clamps.
    pub fn from_name(name: &str) -> Self {
        match name {
            "repeat" => Tiling::Repeat,
            _ => Tiling::Clamp,
        }
    }
}

/// A decoded grayscale image: one luminance value per pixel in [0, 1].
#[derive(Clone, Debug)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    /// Row-major luminance, `width * height` values.
    pub luminance: Vec<f32>,
}

impl Raster {
    /// Wrap raw luminance data. `luminance.len()` must be `width * height`.
    pub fn new(width: usize, height: usize, luminance: Vec<f32>) -> Self {
        debug_assert_eq!(luminance.len(), width * height);
        Self {
            width,
            height,
            luminance,
        }
    }

    /// Convert any decoded image to luminance.
    pub fn from_image(image: &DynamicImage) -> Self {
        let gray = image.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let luminance = gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        Self {
            width,
            height,
            luminance,
        }
    }

    fn texel(&self, x: i64, y: i64, tiling: Tiling) -> f32 {
        let (w, h) = (self.width as i64, self.height as i64);
        let (xi, yi) = match tiling {
            Tiling::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            Tiling::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        self.luminance[(yi * w + xi) as usize]
    }

    /// Bilinear sample at UV coordinates (texel-center convention).
    pub fn sample_bilinear(&self, u: f32, v: f32, tiling: Tiling) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let s00 = self.texel(x0, y0, tiling);
        let s10 = self.texel(x0 + 1, y0, tiling);
        let s01 = self.texel(x0, y0 + 1, tiling);
        let s11 = self.texel(x0 + 1, y0 + 1, tiling);

        let top = s00 + (s10 - s00) * fx;
        let bottom = s01 + (s11 - s01) * fx;
        top + (bottom - top) * fy
    }
}
