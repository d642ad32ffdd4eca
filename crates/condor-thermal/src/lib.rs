//! Thermal map (`.tdm`) codec for Condor scenery.
//!
//! A thermal map stores lift intensity for a landscape as a grayscale grid of
//! arbitrary size.
//!
//! # File Format
//!
//! - 3 bytes: Width (24-bit big-endian)
//! - 1 byte: Padding
//! - 3 bytes: Height (24-bit big-endian)
//! - 1 byte: Padding
//! - `width * height` bytes: Samples, one byte each, in on-disk scan order
//!
//! # Example
//!
//! ```no_run
//! use condor_thermal::{decode_thermal, encode_thermal};
//!
//! let bytes = std::fs::read("Alps.tdm")?;
//! let raster = decode_thermal(&bytes)?;
//! println!("{}x{}", raster.width(), raster.height());
//!
//! std::fs::write("Alps.tdm", encode_thermal(&raster)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod error;
mod header;

pub use codec::{decode_thermal, encode_thermal};
pub use error::{Error, Result};
pub use header::{ThermalHeader, MAX_THERMAL_DIMENSION, THERMAL_HEADER_LEN};

/// Name of the editable thermal layer.
pub const THERMAL_LAYER: &str = "thermal";

/// Opacity, in percent, of the thermal layer.
pub const THERMAL_OPACITY: f32 = 100.0;
