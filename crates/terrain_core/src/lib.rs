//! Core terrain data model and SMF binary codec.
//!
//! This crate provides:
//! - The canonical heightfield grid with quantization, downsampling, and
//!   world-scale metadata
//! - A byte-exact codec for the SMF map format (decode, fresh encode,
//!   copy-on-write height patching)
//! - The decoded document model with independently failing optional
//!   sections
//! - File-level load/save helpers

pub mod document;
pub mod heightfield;
pub mod map_io;
pub mod smf;

pub use document::{ByteMap, Feature, FeatureSection, MapDocument};
pub use heightfield::{
    choose_stride, dequantize, quantize, DownsampledView, HeightfieldGrid,
    DEFAULT_SEGMENT_CEILING,
};
pub use map_io::{load_map, map_file_info, save_map, MapFileInfo, MapIoError, MapIoResult};
pub use smf::{
    decode, encode_flat, encode_with_stubs, patch_heights, patch_heights_with_bounds,
    read_header, DecodeError, EncodeError, FlatSpec, HeightBounds, HeightSource, SmfHeader,
};
