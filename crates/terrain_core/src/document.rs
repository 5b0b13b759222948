//! Decoded map document and its auxiliary section types.
//!
//! A [`MapDocument`] is produced by [`crate::smf::decode`] and is immutable
//! except through the codec's patch paths, which return a new byte buffer.
//! Optional sections are carried as raw records; decoding their pixel data
//! into higher-level forms (tile atlases, minimap images, prop semantics) is
//! the host's concern.

use crate::heightfield::HeightfieldGrid;
use crate::smf::SmfHeader;

/// A rectangular u8 raster section (metal map, type map, grass map).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteMap {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Flat pixel data, row-major.
    pub data: Vec<u8>,
}

impl ByteMap {
    /// Create a zero-filled map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Pixel at (x, y), or 0 if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0
        }
    }
}

/// One raw feature (prop) placement record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feature {
    /// Index into [`FeatureSection::names`].
    pub type_index: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub relative_size: f32,
}

/// The features section: type names plus placement records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSection {
    /// NUL-terminated name strings from the file, in declaration order.
    pub names: Vec<String>,
    /// Placement records; may be fewer than the file declared if the
    /// section was truncated.
    pub features: Vec<Feature>,
}

/// A fully decoded map file.
///
/// The heightmap is mandatory; every other section decodes independently
/// and is `None` when absent or out of bounds (each such skip is recorded
/// in `warnings`).
#[derive(Clone, Debug)]
pub struct MapDocument {
    /// The fixed file header as read from disk.
    pub header: SmfHeader,
    /// The mandatory heightfield at native resolution.
    pub heightmap: HeightfieldGrid,
    /// Metal density, (width/2) x (length/2).
    pub metal_map: Option<ByteMap>,
    /// Terrain type indices, (width/2) x (length/2).
    pub type_map: Option<ByteMap>,
    /// Tile-index records, (width/4) x (length/4). Raw indices only; tile
    /// texture decoding is out of scope.
    pub tile_index: Option<Vec<i32>>,
    /// Raw compressed minimap blob (1024x1024 with mips, 699,048 bytes).
    pub minimap: Option<Vec<u8>>,
    /// Grass coverage, (width/4) x (length/4), located via the extra-header
    /// chain.
    pub grass_map: Option<ByteMap>,
    /// Feature placements.
    pub features: Option<FeatureSection>,
    /// Human-readable notes for every recoverable oddity met during decode.
    pub warnings: Vec<String>,
}

impl MapDocument {
    /// One-line human-readable description of the document.
    pub fn summary(&self) -> String {
        let (ww, wl) = self.heightmap.world_size();
        let mut sections = Vec::new();
        if self.metal_map.is_some() {
            sections.push("metal");
        }
        if self.type_map.is_some() {
            sections.push("type");
        }
        if self.tile_index.is_some() {
            sections.push("tiles");
        }
        if self.minimap.is_some() {
            sections.push("minimap");
        }
        if self.grass_map.is_some() {
            sections.push("grass");
        }
        if self.features.is_some() {
            sections.push("features");
        }
        format!(
            "{}x{} squares ({}x{} world units), heights {}..{}, sections: [{}]{}",
            self.header.width,
            self.header.length,
            ww,
            wl,
            self.header.min_height,
            self.header.max_height,
            sections.join(", "),
            if self.warnings.is_empty() {
                String::new()
            } else {
                format!(", {} warning(s)", self.warnings.len())
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_map_get_out_of_bounds() {
        let mut map = ByteMap::new(4, 4);
        map.data[2 * 4 + 1] = 9;
        assert_eq!(map.get(1, 2), 9);
        assert_eq!(map.get(4, 0), 0);
        assert_eq!(map.get(0, 4), 0);
    }
}
