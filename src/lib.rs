//! Terrain Studio: SMF heightfield codec and interactive brush engine.
//!
//! The facade crate for hosts: re-exports the data model and codec from
//! `terrain_core` and the brush engine from `terrain_brush`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use terrain_studio::{decode, patch_heights, BrushRegistry, BrushStroke, MemoryStore};
//!
//! let doc = decode(&bytes)?;
//! let registry = BrushRegistry::with_builtin(Arc::new(MemoryStore::new()));
//!
//! let stroke = BrushStroke::for_grid(&doc.heightmap, 120.0, -40.0, 48.0, 6.0);
//! let edited = registry.dispatch("raise", &stroke);
//!
//! let saved = patch_heights(&bytes, &edited)?;
//! ```

pub use terrain_brush::*;
pub use terrain_core::*;
