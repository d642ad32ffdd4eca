//! Forest map (`.for`) codec for Condor scenery.
//!
//! A forest map describes the tree cover of one terrain patch as a fixed
//! 512x512 grid of single-byte cells:
//!
//! - `0x00` - no trees, drawn black
//! - `0x01` - coniferous trees, drawn red
//! - `0x02` - deciduous trees, drawn blue
//!
//! The file has no header; it is exactly 262,144 bytes in on-disk scan order.
//! Decoding produces an RGBA raster in the editor's orientation and encoding
//! reverses it.
//!
//! # Example
//!
//! ```no_run
//! use condor_forest::{decode_forest, encode_forest};
//!
//! let bytes = std::fs::read("Forests/0204.for")?;
//! let raster = decode_forest(&bytes)?;
//!
//! // ... paint on the raster ...
//!
//! std::fs::write("Forests/0204.for", encode_forest(&raster)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod cover;
mod error;
mod patch;

pub use codec::{decode_forest, encode_forest, ForestStats, FOREST_FILE_LEN, FOREST_MAP_SIZE};
pub use cover::TreeCover;
pub use error::{Error, Result};
pub use patch::{texture_path, TEXTURE_DIR};

/// Name of the editable forest layer.
pub const FOREST_LAYER: &str = "forest";

/// Opacity, in percent, of the forest layer drawn over its texture.
pub const FOREST_OPACITY: f32 = 25.0;
