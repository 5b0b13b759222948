//! SMF decode path: header, heightmap, and independently failing optional
//! sections.

use log::warn;

use super::{
    read_f32_at, read_i32_at, read_u16_at, read_u32_at, DecodeError, SmfHeader,
    EXPECTED_VERSION, EXTRA_HEADER_GRASS, FEATURE_RECORD_BYTES, HEADER_SIZE, MAGIC_STR,
    MINIMAP_BYTES,
};
use crate::document::{ByteMap, Feature, FeatureSection, MapDocument};
use crate::heightfield::HeightfieldGrid;

/// Parse just the fixed header.
///
/// Validates the magic (tolerating trailing-NUL padding) and dimensions but
/// not section bounds; [`decode`] layers those checks on top.
pub fn read_header(bytes: &[u8]) -> Result<SmfHeader, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TooShort { len: bytes.len() });
    }

    let magic = &bytes[0..16];
    let trimmed_len = magic.iter().position(|&b| b == 0).unwrap_or(16);
    if &magic[..trimmed_len] != MAGIC_STR.as_bytes() {
        return Err(DecodeError::BadMagic);
    }

    let header = SmfHeader {
        version: read_i32_at(bytes, 16),
        id: read_u32_at(bytes, 20),
        width: read_i32_at(bytes, 24),
        length: read_i32_at(bytes, 28),
        square_size: read_i32_at(bytes, 32),
        texels_per_square: read_i32_at(bytes, 36),
        tile_size: read_i32_at(bytes, 40),
        min_height: read_f32_at(bytes, 44),
        max_height: read_f32_at(bytes, 48),
        ofs_heightmap: read_i32_at(bytes, 52),
        ofs_type_map: read_i32_at(bytes, 56),
        ofs_tile_index: read_i32_at(bytes, 60),
        ofs_minimap: read_i32_at(bytes, 64),
        ofs_metal_map: read_i32_at(bytes, 68),
        ofs_features: read_i32_at(bytes, 72),
        num_extra_headers: read_i32_at(bytes, 76),
    };

    if header.width <= 0 || header.length <= 0 {
        return Err(DecodeError::InvalidDimensions {
            width: header.width,
            length: header.length,
        });
    }

    Ok(header)
}

/// Decode a complete map file.
///
/// The heightmap is mandatory; every optional section is bounds-checked on
/// its own and skipped (with a warning) when it does not fit, so a damaged
/// auxiliary section never prevents loading the terrain itself.
pub fn decode(bytes: &[u8]) -> Result<MapDocument, DecodeError> {
    let header = read_header(bytes)?;
    let mut warnings = Vec::new();

    if header.version != EXPECTED_VERSION {
        push_warning(
            &mut warnings,
            format!(
                "unexpected file version {} (expected {}), attempting to read anyway",
                header.version, EXPECTED_VERSION
            ),
        );
    }

    // Mandatory heightmap.
    let hm_extent = header.vertex_count() as u64 * 2;
    if header.ofs_heightmap <= 0
        || header.ofs_heightmap as u64 + hm_extent > bytes.len() as u64
    {
        return Err(DecodeError::HeightmapOutOfBounds {
            offset: header.ofs_heightmap,
            needed: hm_extent,
            len: bytes.len(),
        });
    }
    let hm_start = header.ofs_heightmap as usize;
    let mut heights_u16 = Vec::with_capacity(header.vertex_count());
    for i in 0..header.vertex_count() {
        heights_u16.push(read_u16_at(bytes, hm_start + i * 2));
    }
    let heightmap = HeightfieldGrid::from_quantized(
        header.width,
        header.length,
        header.square_size,
        header.min_height,
        header.max_height,
        heights_u16,
    );

    let half_w = (header.width / 2) as usize;
    let half_l = (header.length / 2) as usize;
    let quarter_w = (header.width / 4) as usize;
    let quarter_l = (header.length / 4) as usize;

    let metal_map = byte_section(bytes, header.ofs_metal_map, half_w, half_l, "metal map", &mut warnings);
    let type_map = byte_section(bytes, header.ofs_type_map, half_w, half_l, "type map", &mut warnings);

    let tile_index = section_slice(
        bytes,
        header.ofs_tile_index,
        quarter_w as u64 * quarter_l as u64 * 4,
        "tile index",
        &mut warnings,
    )
    .map(|slice| {
        slice
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect()
    });

    let minimap = section_slice(
        bytes,
        header.ofs_minimap,
        MINIMAP_BYTES as u64,
        "minimap",
        &mut warnings,
    )
    .map(|slice| slice.to_vec());

    let grass_map = match grass_offset(bytes, &header, &mut warnings) {
        Some(ofs) => byte_section(bytes, ofs, quarter_w, quarter_l, "grass map", &mut warnings),
        None => None,
    };

    let features = decode_features(bytes, header.ofs_features, &mut warnings);

    Ok(MapDocument {
        header,
        heightmap,
        metal_map,
        type_map,
        tile_index,
        minimap,
        grass_map,
        features,
        warnings,
    })
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

/// Bounds-check an optional section and return its bytes, or None.
///
/// Offset 0 means the section was never written (silently absent); a
/// positive offset that overruns the file is a per-section failure and
/// gets a warning.
fn section_slice<'a>(
    bytes: &'a [u8],
    offset: i32,
    extent: u64,
    name: &str,
    warnings: &mut Vec<String>,
) -> Option<&'a [u8]> {
    if offset <= 0 {
        return None;
    }
    let start = offset as u64;
    if start + extent > bytes.len() as u64 {
        push_warning(
            warnings,
            format!(
                "{} section out of bounds (offset {} + {} bytes > file length {}), skipping",
                name,
                offset,
                extent,
                bytes.len()
            ),
        );
        return None;
    }
    Some(&bytes[start as usize..(start + extent) as usize])
}

fn byte_section(
    bytes: &[u8],
    offset: i32,
    width: usize,
    height: usize,
    name: &str,
    warnings: &mut Vec<String>,
) -> Option<ByteMap> {
    section_slice(bytes, offset, width as u64 * height as u64, name, warnings).map(|slice| {
        ByteMap {
            width,
            height,
            data: slice.to_vec(),
        }
    })
}

/// Walk the extra-header chain looking for the grass offset (type 1).
fn grass_offset(bytes: &[u8], header: &SmfHeader, warnings: &mut Vec<String>) -> Option<i32> {
    let mut pos = HEADER_SIZE;
    let mut found = None;
    for _ in 0..header.num_extra_headers.max(0) {
        if pos + 8 > bytes.len() {
            push_warning(
                warnings,
                "extra header chain runs past end of file, stopping".to_string(),
            );
            break;
        }
        let size = read_i32_at(bytes, pos);
        let kind = read_i32_at(bytes, pos + 4);
        if size < 8 || pos as u64 + size as u64 > bytes.len() as u64 {
            push_warning(
                warnings,
                format!("malformed extra header (size {}), stopping chain walk", size),
            );
            break;
        }
        if kind == EXTRA_HEADER_GRASS {
            if size >= 12 {
                found = Some(read_i32_at(bytes, pos + 8));
            } else {
                push_warning(
                    warnings,
                    "grass extra header too small to hold an offset, ignoring".to_string(),
                );
            }
        }
        pos += size as usize;
    }
    found
}

/// Decode the variable-length features section.
///
/// Truncation-tolerant: reads `min(declared, available)` name strings and
/// records, warning instead of failing whenever the file falls short of its
/// own counts.
fn decode_features(
    bytes: &[u8],
    offset: i32,
    warnings: &mut Vec<String>,
) -> Option<FeatureSection> {
    if offset <= 0 {
        return None;
    }
    let start = offset as usize;
    if start + 8 > bytes.len() {
        push_warning(
            warnings,
            format!(
                "features section header out of bounds (offset {}), skipping",
                offset
            ),
        );
        return None;
    }

    let mut num_features = read_i32_at(bytes, start);
    let mut num_types = read_i32_at(bytes, start + 4);
    if num_features < 0 || num_types < 0 {
        push_warning(
            warnings,
            format!(
                "negative feature counts ({} features, {} types), treating as empty",
                num_features, num_types
            ),
        );
        num_features = num_features.max(0);
        num_types = num_types.max(0);
    }

    let mut pos = start + 8;
    let mut names = Vec::with_capacity(num_types as usize);
    for _ in 0..num_types {
        match bytes[pos..].iter().position(|&b| b == 0) {
            Some(nul) => {
                names.push(String::from_utf8_lossy(&bytes[pos..pos + nul]).into_owned());
                pos += nul + 1;
            }
            None => {
                push_warning(
                    warnings,
                    format!(
                        "feature name list truncated ({} of {} names read)",
                        names.len(),
                        num_types
                    ),
                );
                pos = bytes.len();
                break;
            }
        }
    }

    let available = (bytes.len() - pos) / FEATURE_RECORD_BYTES;
    let count = (num_features as usize).min(available);
    if count < num_features as usize {
        push_warning(
            warnings,
            format!(
                "features section truncated: {} of {} records available",
                count, num_features
            ),
        );
    }

    let mut features = Vec::with_capacity(count);
    for i in 0..count {
        let base = pos + i * FEATURE_RECORD_BYTES;
        features.push(Feature {
            type_index: read_i32_at(bytes, base),
            x: read_f32_at(bytes, base + 4),
            y: read_f32_at(bytes, base + 8),
            z: read_f32_at(bytes, base + 12),
            rotation: read_f32_at(bytes, base + 16),
            relative_size: read_f32_at(bytes, base + 20),
        });
    }

    Some(FeatureSection { names, features })
}
