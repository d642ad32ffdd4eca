//! Common utilities for Condor map tools.
//!
//! This crate provides the types shared by the map codecs:
//!
//! - [`RasterBuffer`] - An owned pixel grid with a fixed channel layout
//! - [`transform`] - Quarter-turn rotations and mirroring of raster buffers
//! - [`BinaryReader`] - Cursor-style reading of binary headers

mod error;
mod raster;
mod reader;

pub mod transform;

pub use error::{Error, Result};
pub use raster::{Channels, RasterBuffer};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
