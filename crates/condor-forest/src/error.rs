//! Error types for forest map handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with forest maps.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] condor_common::Error),

    /// The file is not exactly one 512x512 map long.
    #[error("forest map size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The raster cannot be encoded as a forest map.
    #[error("forest map must be 512x512 RGBA, got {width}x{height} with {channels} channel(s)")]
    ShapeMismatch { width: u32, height: u32, channels: u8 },

    /// A cell holds a code other than 0, 1 or 2.
    #[error("unsupported forest code {value:#04x} at offset {offset}")]
    UnsupportedPixelValue { offset: usize, value: u8 },

    /// The file name has no patch number to derive the texture from.
    #[error("cannot derive a texture patch name from {0}")]
    InvalidPatchName(PathBuf),
}

/// Result type for forest map operations.
pub type Result<T> = std::result::Result<T, Error>;
