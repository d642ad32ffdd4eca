//! Error types for condor-common.

use thiserror::Error;

/// Common error type for Condor map operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// Pixel storage does not match the declared dimensions.
    #[error("pixel layout mismatch: expected {expected} bytes, got {actual}")]
    Layout { expected: usize, actual: usize },

    /// Dimensions whose byte length cannot be addressed.
    #[error("raster dimensions {width}x{height}x{channels} overflow addressable memory")]
    DimensionOverflow { width: u32, height: u32, channels: u8 },

    /// Channel count outside the supported layouts.
    #[error("unsupported channel count: {0}")]
    InvalidChannels(u8),

    /// Pixel coordinate outside the raster.
    #[error("pixel ({row}, {col}) out of bounds for {width}x{height} raster")]
    OutOfBounds {
        row: u32,
        col: u32,
        width: u32,
        height: u32,
    },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
