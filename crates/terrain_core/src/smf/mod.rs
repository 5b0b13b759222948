//! SMF ("spring map file") binary codec.
//!
//! Stateless pure functions over byte buffers: [`decode`] parses a file into
//! a [`crate::document::MapDocument`]; [`encode_flat`] / [`encode_with_stubs`]
//! build fresh files from a float heightfield; [`patch_heights`] /
//! [`patch_heights_with_bounds`] rewrite only the heightmap region of an
//! existing buffer, preserving every other byte verbatim.
//!
//! # Layout
//!
//! Little-endian throughout, offsets relative to file start. The fixed
//! header is 80 bytes: a 16-byte NUL-padded magic, 15 scalar fields, and an
//! extra-header count. Extra headers are chained `{size, type, payload}`
//! blocks directly after the fixed header; type 1 carries the grass map
//! offset. Section offsets of 0 mean "absent".

mod decode;
mod encode;

pub use decode::{decode, read_header};
pub use encode::{
    encode_flat, encode_with_stubs, patch_heights, patch_heights_with_bounds, FlatSpec,
    HeightBounds, HeightSource,
};

/// On-disk signature, NUL-padded to 16 bytes.
pub const MAGIC: &[u8; 16] = b"spring map file\0";
/// The magic with padding stripped.
pub const MAGIC_STR: &str = "spring map file";
/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 80;
/// File format version this codec targets. Other versions decode with a
/// warning, not an error.
pub const EXPECTED_VERSION: i32 = 1;
/// Fixed size of the compressed minimap blob (1024x1024 DXT1 plus mips).
pub const MINIMAP_BYTES: usize = 699_048;
/// Size of one feature placement record.
pub const FEATURE_RECORD_BYTES: usize = 24;
/// Extra-header type carrying the grass map offset.
pub const EXTRA_HEADER_GRASS: i32 = 1;

/// The fixed-size file header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmfHeader {
    /// Format version; 1 is expected, anything else is tolerated.
    pub version: i32,
    /// Opaque map identifier.
    pub id: u32,
    /// Map width in squares.
    pub width: i32,
    /// Map length in squares.
    pub length: i32,
    /// World units per square edge.
    pub square_size: i32,
    /// Texture texels per square.
    pub texels_per_square: i32,
    /// Tile edge length in texels.
    pub tile_size: i32,
    /// Lower quantization bound.
    pub min_height: f32,
    /// Upper quantization bound.
    pub max_height: f32,
    pub ofs_heightmap: i32,
    pub ofs_type_map: i32,
    pub ofs_tile_index: i32,
    pub ofs_minimap: i32,
    pub ofs_metal_map: i32,
    pub ofs_features: i32,
    /// Number of chained extra-header blocks after the fixed header.
    pub num_extra_headers: i32,
}

impl SmfHeader {
    /// Vertices per row.
    pub fn vertex_width(&self) -> usize {
        self.width as usize + 1
    }

    /// Vertices per column.
    pub fn vertex_length(&self) -> usize {
        self.length as usize + 1
    }

    /// Height samples in the heightmap section.
    pub fn vertex_count(&self) -> usize {
        self.vertex_width() * self.vertex_length()
    }
}

/// Fatal decode failures. Recoverable conditions (skipped optional
/// sections, version drift, truncated features) become document warnings
/// instead.
#[derive(Debug)]
pub enum DecodeError {
    /// File shorter than the fixed header.
    TooShort { len: usize },
    /// Magic bytes did not match the signature.
    BadMagic,
    /// Non-positive width or length.
    InvalidDimensions { width: i32, length: i32 },
    /// The mandatory heightmap section is missing or out of file bounds.
    HeightmapOutOfBounds { offset: i32, needed: u64, len: usize },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TooShort { len } => {
                write!(f, "file too short for header: {} bytes, need {}", len, HEADER_SIZE)
            }
            DecodeError::BadMagic => {
                write!(f, "not a spring map file: bad magic")
            }
            DecodeError::InvalidDimensions { width, length } => {
                write!(f, "invalid map dimensions: {}x{}", width, length)
            }
            DecodeError::HeightmapOutOfBounds { offset, needed, len } => write!(
                f,
                "heightmap section out of bounds: offset {} + {} bytes > file length {}",
                offset, needed, len
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Fatal encode/patch failures. These are programming errors, never user
/// data issues; a file must not be corrupted silently.
#[derive(Debug)]
pub enum EncodeError {
    /// Heights array length does not match `(width+1)*(length+1)`.
    HeightCountMismatch { expected: usize, actual: usize },
    /// Non-positive width or length in a build spec.
    InvalidDimensions { width: i32, length: i32 },
    /// Patch target failed to decode.
    Decode(DecodeError),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::HeightCountMismatch { expected, actual } => write!(
                f,
                "height count mismatch: expected {} samples, got {}",
                expected, actual
            ),
            EncodeError::InvalidDimensions { width, length } => {
                write!(f, "invalid map dimensions: {}x{}", width, length)
            }
            EncodeError::Decode(e) => write!(f, "patch target invalid: {}", e),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<DecodeError> for EncodeError {
    fn from(e: DecodeError) -> Self {
        EncodeError::Decode(e)
    }
}

// Little-endian scalar reads against a flat buffer. Callers bounds-check
// before slicing; these helpers assume the range is valid.
pub(crate) fn read_i32_at(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

pub(crate) fn read_u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

pub(crate) fn read_u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
}

pub(crate) fn read_f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}
