//! Owned raster buffers.

use std::slice::ChunksExact;

use crate::{Error, Result};

/// Channel counts used by the map codecs.
pub struct Channels;

impl Channels {
    /// Single grayscale channel.
    pub const GRAY: u8 = 1;
    /// Grayscale plus alpha.
    pub const GRAY_ALPHA: u8 = 2;
    /// Red, green, blue.
    pub const RGB: u8 = 3;
    /// Red, green, blue, alpha.
    pub const RGBA: u8 = 4;
}

/// A width x height grid of pixels stored as a flat, row-major byte vector.
///
/// The pixel at `(row, col)` starts at byte `(row * width + col) * channels`.
/// Dimensions and channel layout are fixed at construction, and the storage
/// length always equals `width * height * channels`.
///
/// # Example
///
/// ```
/// use condor_common::{Channels, RasterBuffer};
///
/// let mut buffer = RasterBuffer::new(2, 1, Channels::GRAY).unwrap();
/// buffer.set_pixel(0, 1, &[0x80]).unwrap();
///
/// assert_eq!(buffer.pixels(), &[0x00, 0x80]);
/// assert!(buffer.pixel(1, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = Self::byte_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            pixels: vec![0u8; len],
        })
    }

    /// Create a buffer from existing pixel storage.
    ///
    /// Fails with [`Error::Layout`] when `pixels` is not exactly
    /// `width * height * channels` bytes long.
    pub fn from_pixels(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height, channels)?;
        if pixels.len() != expected {
            return Err(Error::Layout {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Assemble a buffer whose layout the caller has already established.
    pub(crate) fn from_parts(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            Self::byte_len(width, height, channels).ok(),
            Some(pixels.len())
        );
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Number of bytes needed for the given dimensions.
    pub fn byte_len(width: u32, height: u32, channels: u8) -> Result<usize> {
        if !(Channels::GRAY..=Channels::RGBA).contains(&channels) {
            return Err(Error::InvalidChannels(channels));
        }

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or(Error::DimensionOverflow {
                width,
                height,
                channels,
            })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Width, height and channel count in one call.
    #[inline]
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }

    /// Raw pixel bytes in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the pixel bytes. The length cannot change.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer and return its storage.
    #[inline]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of the pixel at `(row, col)`.
    pub fn offset(&self, row: u32, col: u32) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(Error::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok((row as usize * self.width as usize + col as usize) * self.channels as usize)
    }

    /// The channel bytes of one pixel.
    pub fn pixel(&self, row: u32, col: u32) -> Result<&[u8]> {
        let start = self.offset(row, col)?;
        Ok(&self.pixels[start..start + self.channels as usize])
    }

    /// Overwrite one pixel. `value` must hold exactly `channels` bytes.
    pub fn set_pixel(&mut self, row: u32, col: u32, value: &[u8]) -> Result<()> {
        if value.len() != self.channels as usize {
            return Err(Error::Layout {
                expected: self.channels as usize,
                actual: value.len(),
            });
        }
        let start = self.offset(row, col)?;
        self.pixels[start..start + value.len()].copy_from_slice(value);
        Ok(())
    }

    /// Iterate over pixels in row-major order, one channel slice per pixel.
    pub fn iter_pixels(&self) -> ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.channels as usize)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        // chunks_exact panics on zero, which an empty-width raster would give
        let row_len = (self.width as usize * self.channels as usize).max(1);
        self.pixels.chunks_exact(row_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let buffer = RasterBuffer::new(3, 2, Channels::RGBA).unwrap();
        assert_eq!(buffer.pixels().len(), 24);
        assert!(buffer.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_pixels_rejects_bad_length() {
        let err = RasterBuffer::from_pixels(2, 2, Channels::GRAY, vec![0; 3]).unwrap_err();
        assert!(matches!(err, Error::Layout { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_invalid_channels() {
        assert!(matches!(
            RasterBuffer::new(1, 1, 0),
            Err(Error::InvalidChannels(0))
        ));
        assert!(matches!(
            RasterBuffer::new(1, 1, 5),
            Err(Error::InvalidChannels(5))
        ));
    }

    #[test]
    fn test_pixel_addressing() {
        let pixels: Vec<u8> = (0..12).collect();
        let buffer = RasterBuffer::from_pixels(3, 2, Channels::GRAY_ALPHA, pixels).unwrap();

        assert_eq!(buffer.pixel(0, 0).unwrap(), &[0, 1]);
        assert_eq!(buffer.pixel(1, 2).unwrap(), &[10, 11]);
        assert_eq!(buffer.offset(1, 0).unwrap(), 6);
    }

    #[test]
    fn test_out_of_bounds() {
        let buffer = RasterBuffer::new(4, 4, Channels::GRAY).unwrap();
        assert!(matches!(
            buffer.pixel(4, 0),
            Err(Error::OutOfBounds { row: 4, col: 0, .. })
        ));
        assert!(buffer.pixel(0, 4).is_err());
    }

    #[test]
    fn test_set_pixel_checks_length() {
        let mut buffer = RasterBuffer::new(1, 1, Channels::RGBA).unwrap();
        assert!(buffer.set_pixel(0, 0, &[1, 2, 3]).is_err());
        buffer.set_pixel(0, 0, &[1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.pixels(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_rows() {
        let buffer = RasterBuffer::from_pixels(2, 3, Channels::GRAY, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rows: Vec<&[u8]> = buffer.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..], &[5, 6][..]]);
    }
}
