//! Forest map encoding and decoding.

use condor_common::transform::{flip_horizontal, rotate_quarter_turn};
use condor_common::{Channels, RasterBuffer};
use tracing::debug;

use crate::{Error, Result, TreeCover};

/// Width and height of every forest map, in cells.
pub const FOREST_MAP_SIZE: u32 = 512;

/// Exact length of a forest map file.
pub const FOREST_FILE_LEN: usize = (FOREST_MAP_SIZE * FOREST_MAP_SIZE) as usize;

/// Decode a forest map into a 512x512 RGBA raster in editor orientation.
///
/// Each cell becomes one opaque pixel coloured after its [`TreeCover`]. The
/// file's scan order is then rotated a quarter turn counter-clockwise and
/// mirrored, which places on-disk cell `(r, c)` at raster pixel `(c, r)`.
///
/// # Errors
///
/// - [`Error::SizeMismatch`] if `bytes` is not exactly [`FOREST_FILE_LEN`] long
/// - [`Error::UnsupportedPixelValue`] for any code other than 0, 1 or 2
pub fn decode_forest(bytes: &[u8]) -> Result<RasterBuffer> {
    if bytes.len() != FOREST_FILE_LEN {
        return Err(Error::SizeMismatch {
            expected: FOREST_FILE_LEN,
            actual: bytes.len(),
        });
    }

    let mut pixels = Vec::with_capacity(FOREST_FILE_LEN * Channels::RGBA as usize);
    for (offset, &value) in bytes.iter().enumerate() {
        let cover =
            TreeCover::from_code(value).ok_or(Error::UnsupportedPixelValue { offset, value })?;
        pixels.extend_from_slice(&cover.rgba());
    }

    let scan = RasterBuffer::from_pixels(FOREST_MAP_SIZE, FOREST_MAP_SIZE, Channels::RGBA, pixels)?;
    let raster = flip_horizontal(&rotate_quarter_turn(&scan, false));

    debug!(cells = FOREST_FILE_LEN, "decoded forest map");
    Ok(raster)
}

/// Encode a 512x512 RGBA raster back into forest map bytes.
///
/// The orientation transforms of [`decode_forest`] are undone first. Pixels
/// that are not exactly opaque red or opaque blue are written as "no trees",
/// so painting with any other colour clears the cell.
///
/// # Errors
///
/// [`Error::ShapeMismatch`] if the raster is not 512x512 with four channels.
pub fn encode_forest(raster: &RasterBuffer) -> Result<Vec<u8>> {
    let (width, height, channels) = raster.shape();
    if width != FOREST_MAP_SIZE || height != FOREST_MAP_SIZE || channels != Channels::RGBA {
        return Err(Error::ShapeMismatch {
            width,
            height,
            channels,
        });
    }

    let scan = rotate_quarter_turn(&flip_horizontal(raster), true);
    let bytes: Vec<u8> = scan
        .iter_pixels()
        .map(|pixel| TreeCover::from_rgba(pixel).code())
        .collect();

    debug!(cells = bytes.len(), "encoded forest map");
    Ok(bytes)
}

/// Number of cells of each cover kind in a forest map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub none: usize,
    pub coniferous: usize,
    pub deciduous: usize,
}

impl ForestStats {
    /// Count the cover kinds of a raw forest map.
    ///
    /// Validates the file the same way [`decode_forest`] does.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FOREST_FILE_LEN {
            return Err(Error::SizeMismatch {
                expected: FOREST_FILE_LEN,
                actual: bytes.len(),
            });
        }

        let mut stats = Self::default();
        for (offset, &value) in bytes.iter().enumerate() {
            match TreeCover::from_code(value) {
                Some(TreeCover::None) => stats.none += 1,
                Some(TreeCover::Coniferous) => stats.coniferous += 1,
                Some(TreeCover::Deciduous) => stats.deciduous += 1,
                None => return Err(Error::UnsupportedPixelValue { offset, value }),
            }
        }
        Ok(stats)
    }

    /// Number of cells with any trees.
    pub fn forested(&self) -> usize {
        self.coniferous + self.deciduous
    }
}
