//! SMF encode paths: build-fresh buffers and copy-on-write height patches.

use super::{
    read_header, DecodeError, EncodeError, EXPECTED_VERSION, HEADER_SIZE, MAGIC, MINIMAP_BYTES,
};
use crate::heightfield::quantize;

/// Where a fresh file's height samples come from.
#[derive(Clone, Debug)]
pub enum HeightSource {
    /// Every vertex gets the same raw u16 value.
    Uniform(u16),
    /// World-unit heights, quantized against the spec's min/max. Length
    /// must be `(width+1)*(length+1)`.
    Floats(Vec<f32>),
}

/// Specification for building a fresh map file.
#[derive(Clone, Debug)]
pub struct FlatSpec {
    pub width: i32,
    pub length: i32,
    pub id: u32,
    pub square_size: i32,
    pub texels_per_square: i32,
    pub tile_size: i32,
    pub min_height: f32,
    pub max_height: f32,
    pub heights: HeightSource,
}

impl Default for FlatSpec {
    fn default() -> Self {
        Self {
            width: 0,
            length: 0,
            id: 0,
            square_size: 8,
            texels_per_square: 8,
            tile_size: 32,
            min_height: 0.0,
            max_height: 1.0,
            heights: HeightSource::Uniform(0),
        }
    }
}

/// Optional header bound overrides for
/// [`patch_heights_with_bounds`]. `None` keeps the original value.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeightBounds {
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
}

struct SectionOffsets {
    heightmap: i32,
    type_map: i32,
    minimap: i32,
    metal_map: i32,
    features: i32,
}

/// Encode header + heightmap only; all other section offsets are 0.
pub fn encode_flat(spec: &FlatSpec) -> Result<Vec<u8>, EncodeError> {
    let heights = quantized_heights(spec)?;

    let offsets = SectionOffsets {
        heightmap: HEADER_SIZE as i32,
        type_map: 0,
        minimap: 0,
        metal_map: 0,
        features: 0,
    };

    let mut bytes = Vec::with_capacity(HEADER_SIZE + heights.len() * 2);
    write_header(&mut bytes, spec, &offsets);
    for raw in &heights {
        bytes.extend_from_slice(&raw.to_le_bytes());
    }
    Ok(bytes)
}

/// Encode header + heightmap plus well-formed zero-filled stub sections
/// (type map, minimap, metal map, empty features), so downstream loaders
/// see a complete, if blank, map.
pub fn encode_with_stubs(spec: &FlatSpec) -> Result<Vec<u8>, EncodeError> {
    let heights = quantized_heights(spec)?;

    let half_bytes = (spec.width / 2) as usize * (spec.length / 2) as usize;
    let hm_start = HEADER_SIZE;
    let type_start = hm_start + heights.len() * 2;
    let mini_start = type_start + half_bytes;
    let metal_start = mini_start + MINIMAP_BYTES;
    let feature_start = metal_start + half_bytes;

    let offsets = SectionOffsets {
        heightmap: hm_start as i32,
        type_map: type_start as i32,
        minimap: mini_start as i32,
        metal_map: metal_start as i32,
        features: feature_start as i32,
    };

    let mut bytes = Vec::with_capacity(feature_start + 8);
    write_header(&mut bytes, spec, &offsets);
    for raw in &heights {
        bytes.extend_from_slice(&raw.to_le_bytes());
    }
    bytes.resize(type_start + half_bytes, 0); // type map stub
    bytes.resize(mini_start + MINIMAP_BYTES, 0); // minimap stub
    bytes.resize(metal_start + half_bytes, 0); // metal map stub
    bytes.extend_from_slice(&0i32.to_le_bytes()); // numFeatures
    bytes.extend_from_slice(&0i32.to_le_bytes()); // numTypes
    Ok(bytes)
}

/// Copy the original buffer and rewrite only the heightmap region,
/// re-quantizing `heights` under the original header bounds. Every byte
/// outside that region is preserved verbatim.
pub fn patch_heights(original: &[u8], heights: &[f32]) -> Result<Vec<u8>, EncodeError> {
    patch_heights_with_bounds(original, heights, HeightBounds::default())
}

/// Like [`patch_heights`], but also rewrites the header's min/max height
/// fields (where overridden) and quantizes under the new bounds.
pub fn patch_heights_with_bounds(
    original: &[u8],
    heights: &[f32],
    bounds: HeightBounds,
) -> Result<Vec<u8>, EncodeError> {
    let header = read_header(original)?;
    if heights.len() != header.vertex_count() {
        return Err(EncodeError::HeightCountMismatch {
            expected: header.vertex_count(),
            actual: heights.len(),
        });
    }
    let extent = header.vertex_count() as u64 * 2;
    if header.ofs_heightmap <= 0 || header.ofs_heightmap as u64 + extent > original.len() as u64 {
        return Err(DecodeError::HeightmapOutOfBounds {
            offset: header.ofs_heightmap,
            needed: extent,
            len: original.len(),
        }
        .into());
    }

    let min = bounds.min_height.unwrap_or(header.min_height);
    let max = bounds.max_height.unwrap_or(header.max_height);

    let mut out = original.to_vec();
    if bounds.min_height.is_some() {
        out[44..48].copy_from_slice(&min.to_le_bytes());
    }
    if bounds.max_height.is_some() {
        out[48..52].copy_from_slice(&max.to_le_bytes());
    }

    let start = header.ofs_heightmap as usize;
    for (i, &h) in heights.iter().enumerate() {
        let raw = quantize(h, min, max);
        out[start + i * 2..start + i * 2 + 2].copy_from_slice(&raw.to_le_bytes());
    }
    Ok(out)
}

fn quantized_heights(spec: &FlatSpec) -> Result<Vec<u16>, EncodeError> {
    if spec.width <= 0 || spec.length <= 0 {
        return Err(EncodeError::InvalidDimensions {
            width: spec.width,
            length: spec.length,
        });
    }
    let count = (spec.width as usize + 1) * (spec.length as usize + 1);
    match &spec.heights {
        HeightSource::Uniform(raw) => Ok(vec![*raw; count]),
        HeightSource::Floats(values) => {
            if values.len() != count {
                return Err(EncodeError::HeightCountMismatch {
                    expected: count,
                    actual: values.len(),
                });
            }
            Ok(values
                .iter()
                .map(|&h| quantize(h, spec.min_height, spec.max_height))
                .collect())
        }
    }
}

fn write_header(bytes: &mut Vec<u8>, spec: &FlatSpec, offsets: &SectionOffsets) {
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&EXPECTED_VERSION.to_le_bytes());
    bytes.extend_from_slice(&spec.id.to_le_bytes());
    bytes.extend_from_slice(&spec.width.to_le_bytes());
    bytes.extend_from_slice(&spec.length.to_le_bytes());
    bytes.extend_from_slice(&spec.square_size.to_le_bytes());
    bytes.extend_from_slice(&spec.texels_per_square.to_le_bytes());
    bytes.extend_from_slice(&spec.tile_size.to_le_bytes());
    bytes.extend_from_slice(&spec.min_height.to_le_bytes());
    bytes.extend_from_slice(&spec.max_height.to_le_bytes());
    bytes.extend_from_slice(&offsets.heightmap.to_le_bytes());
    bytes.extend_from_slice(&offsets.type_map.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes()); // tile index: never stubbed
    bytes.extend_from_slice(&offsets.minimap.to_le_bytes());
    bytes.extend_from_slice(&offsets.metal_map.to_le_bytes());
    bytes.extend_from_slice(&offsets.features.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes()); // no extra headers
    debug_assert_eq!(bytes.len(), HEADER_SIZE);
}
