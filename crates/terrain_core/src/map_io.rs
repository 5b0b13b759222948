//! Map file load/save helpers.
//!
//! Thin path-level conveniences over the byte-buffer codec in
//! [`crate::smf`]: read a file and decode it, write an encoded buffer back,
//! or peek at a file's header without decoding the sections.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::document::MapDocument;
use crate::smf::{decode, read_header, DecodeError};

/// Errors that can occur during map file I/O.
#[derive(Debug)]
pub enum MapIoError {
    /// File system error.
    Io(std::io::Error),
    /// The file contents failed to decode.
    Decode(DecodeError),
}

impl std::fmt::Display for MapIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapIoError::Io(e) => write!(f, "IO error: {}", e),
            MapIoError::Decode(e) => write!(f, "decode error: {}", e),
        }
    }
}

impl std::error::Error for MapIoError {}

impl From<std::io::Error> for MapIoError {
    fn from(e: std::io::Error) -> Self {
        MapIoError::Io(e)
    }
}

impl From<DecodeError> for MapIoError {
    fn from(e: DecodeError) -> Self {
        MapIoError::Decode(e)
    }
}

/// Result type for map I/O operations.
pub type MapIoResult<T> = Result<T, MapIoError>;

/// Read and decode a map file.
pub fn load_map<P: AsRef<Path>>(path: P) -> MapIoResult<MapDocument> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(decode(&bytes)?)
}

/// Write an encoded map buffer to disk.
pub fn save_map<P: AsRef<Path>>(path: P, bytes: &[u8]) -> MapIoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Header-level information about a map file, read without decoding the
/// section data.
#[derive(Debug, Clone)]
pub struct MapFileInfo {
    /// Map width in squares.
    pub width: i32,
    /// Map length in squares.
    pub length: i32,
    /// File format version.
    pub version: i32,
    /// Height range from the header.
    pub min_height: f32,
    pub max_height: f32,
    /// File size in bytes.
    pub file_size: u64,
}

/// Peek at a map file's header.
pub fn map_file_info<P: AsRef<Path>>(path: P) -> MapIoResult<MapFileInfo> {
    let path = path.as_ref();
    let file_size = std::fs::metadata(path)?.len();

    let mut file = File::open(path)?;
    let mut header_bytes = vec![0u8; crate::smf::HEADER_SIZE];
    file.read_exact(&mut header_bytes)
        .map_err(|_| MapIoError::Decode(DecodeError::TooShort { len: file_size as usize }))?;
    let header = read_header(&header_bytes)?;

    Ok(MapFileInfo {
        width: header.width,
        length: header.length,
        version: header.version,
        min_height: header.min_height,
        max_height: header.max_height,
        file_size,
    })
}
