//! Error types for thermal map handling.

use thiserror::Error;

/// Errors that can occur when working with thermal maps.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] condor_common::Error),

    /// The sample data does not match the dimensions in the header.
    #[error("thermal map size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The raster cannot be encoded as a thermal map.
    #[error("thermal map must be single-channel with sides below 2^24, got {width}x{height} with {channels} channel(s)")]
    ShapeMismatch { width: u32, height: u32, channels: u8 },
}

/// Result type for thermal map operations.
pub type Result<T> = std::result::Result<T, Error>;
