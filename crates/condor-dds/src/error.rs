//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] condor_common::Error),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// Pixel format this crate cannot read.
    #[error("unsupported DDS pixel format: {0}")]
    UnsupportedFormat(String),

    /// Raster channel layout that cannot be written as a texture.
    #[error("DDS textures need RGBA rasters, got {0} channel(s)")]
    UnsupportedChannels(u8),

    /// Pixel data shorter than the header announces.
    #[error("DDS pixel data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
