//! DDS texture handling for Condor texture patches.
//!
//! Condor terrain textures are DDS files. This crate reads and writes the
//! uncompressed 32-bit (A8R8G8B8) and 16-bit (A4R4G4B4) layouts with optional
//! mip chains. Block-compressed textures are recognised and rejected; a
//! compressor can be supplied through the [`TextureCodec`] trait.
//!
//! # Example
//!
//! ```no_run
//! use condor_dds::{load_dds, save_dds, DdsOptions};
//!
//! let texture = load_dds("Textures/t0204.dds")?;
//! save_dds(&texture, "Textures/t0204_rgba4.dds", &DdsOptions::rgba4())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod error;
mod format;
mod header;
mod texture;

pub use codec::{decode_dds, encode_dds, load_dds, save_dds};
pub use error::{Error, Result};
pub use format::{DdsFormat, DdsOptions, MipmapFilter};
pub use header::{DdsHeader, DdsPixelFormat, FourCC};
pub use texture::{TextureCodec, UncompressedDds};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
