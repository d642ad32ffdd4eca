//! Error types for map documents and batch conversion.

use thiserror::Error;

use crate::{ImageId, LayerId};

/// Errors that can occur while editing or converting maps.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] condor_common::Error),

    /// Forest map error.
    #[error("{0}")]
    Forest(#[from] condor_forest::Error),

    /// Thermal map error.
    #[error("{0}")]
    Thermal(#[from] condor_thermal::Error),

    /// Texture error.
    #[error("{0}")]
    Dds(#[from] condor_dds::Error),

    /// Error from the image codecs.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid glob pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The image has no layer with the required name.
    #[error("image has no {0:?} layer")]
    MissingLayer(String),

    /// The image has no layers at all.
    #[error("image has no layers")]
    EmptyImage,

    /// Image handle that does not belong to this host.
    #[error("unknown image {0:?}")]
    UnknownImage(ImageId),

    /// Layer handle that does not belong to this host.
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),

    /// Pixel data whose shape does not match its destination.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },
}

/// Result type for map documents and batch conversion.
pub type Result<T> = std::result::Result<T, Error>;
