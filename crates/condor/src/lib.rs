//! Condor - forest and thermal map editing library.
//!
//! This crate ties the map codecs to a layered image model so that Condor
//! scenery maps can be opened, edited and saved like ordinary images.
//!
//! # Crates
//!
//! - [`condor_common`] - Raster buffers, orientation transforms, binary reading
//! - [`condor_forest`] - Forest map (`.for`) codec
//! - [`condor_thermal`] - Thermal map (`.tdm`) codec
//! - [`condor_dds`] - Uncompressed DDS textures
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use condor::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let image = load_forest(&mut host, &UncompressedDds, Path::new("Forests/0204.for"))?;
//!
//! // ... edit the "forest" layer through the host ...
//!
//! save_forest(&host, image, Path::new("Forests/0204.for"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod host;

pub mod batch;
pub mod convert;
pub mod document;

pub use error::{Error, Result};
pub use host::{ImageId, LayerId, MemoryHost, RasterHost};

// Re-export all sub-crates
pub use condor_common as common;
pub use condor_dds as dds;
pub use condor_forest as forest;
pub use condor_thermal as thermal;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{convert_to_dds, downsize_dds, merge_bmp_alpha_to_dds, BatchReport};
    pub use crate::document::{load_forest, load_forest_map, load_thermal, save_forest, save_thermal};
    pub use crate::{ImageId, LayerId, MemoryHost, RasterHost};
    pub use condor_common::{Channels, RasterBuffer};
    pub use condor_dds::{DdsOptions, TextureCodec, UncompressedDds};
    pub use condor_forest::{decode_forest, encode_forest, ForestStats, TreeCover};
    pub use condor_thermal::{decode_thermal, encode_thermal};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
