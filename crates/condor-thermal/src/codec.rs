//! Thermal map encoding and decoding.

use condor_common::transform::rotate_half_turn;
use condor_common::{Channels, RasterBuffer};
use tracing::debug;

use crate::{Error, Result, ThermalHeader, THERMAL_HEADER_LEN};

/// Decode a thermal map into a grayscale raster in editor orientation.
///
/// Samples are stored one byte each, upside down and mirrored relative to the
/// editor, so the grid is turned 180 degrees after reading.
///
/// # Errors
///
/// [`Error::SizeMismatch`] if the data is shorter than the header or the
/// sample count differs from `width * height`.
pub fn decode_thermal(bytes: &[u8]) -> Result<RasterBuffer> {
    let header = ThermalHeader::parse(bytes)?;

    let expected = THERMAL_HEADER_LEN
        .checked_add(header.sample_count())
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: bytes.len(),
        })?;
    if bytes.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let scan = RasterBuffer::from_pixels(
        header.width,
        header.height,
        Channels::GRAY,
        bytes[THERMAL_HEADER_LEN..].to_vec(),
    )?;

    debug!(width = header.width, height = header.height, "decoded thermal map");
    Ok(rotate_half_turn(&scan))
}

/// Encode a grayscale raster as a thermal map.
///
/// The header uses the same 24-bit big-endian layout that [`decode_thermal`]
/// reads, followed by one byte per sample.
///
/// # Errors
///
/// [`Error::ShapeMismatch`] if the raster has more than one channel or a side
/// longer than the header can describe.
pub fn encode_thermal(raster: &RasterBuffer) -> Result<Vec<u8>> {
    let (width, height, channels) = raster.shape();
    if channels != Channels::GRAY {
        return Err(Error::ShapeMismatch {
            width,
            height,
            channels,
        });
    }

    let header = ThermalHeader { width, height }.to_bytes()?;
    let scan = rotate_half_turn(raster);

    let mut bytes = Vec::with_capacity(THERMAL_HEADER_LEN + scan.pixels().len());
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(scan.pixels());

    debug!(width, height, "encoded thermal map");
    Ok(bytes)
}
