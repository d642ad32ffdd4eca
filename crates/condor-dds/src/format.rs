//! Uncompressed pixel layouts and save options.

use byteorder::{ByteOrder, LittleEndian};
use image::imageops::FilterType;

/// Uncompressed DDS pixel layouts this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DdsFormat {
    /// 32-bit A8R8G8B8.
    #[default]
    Rgba8,
    /// 16-bit A4R4G4B4.
    Rgba4,
}

impl DdsFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgba4 => 2,
        }
    }

    /// Channel bit masks in RGBA order.
    pub const fn masks(self) -> [u32; 4] {
        match self {
            Self::Rgba8 => [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
            Self::Rgba4 => [0x0F00, 0x00F0, 0x000F, 0xF000],
        }
    }

    /// Append one RGBA pixel in this layout.
    pub fn pack(self, rgba: &[u8], out: &mut Vec<u8>) {
        match self {
            Self::Rgba8 => out.extend_from_slice(&[rgba[2], rgba[1], rgba[0], rgba[3]]),
            Self::Rgba4 => {
                let [r, g, b, a] = [rgba[0], rgba[1], rgba[2], rgba[3]].map(to_nibble);
                let value = (a << 12) | (r << 8) | (g << 4) | b;
                let mut bytes = [0u8; 2];
                LittleEndian::write_u16(&mut bytes, value);
                out.extend_from_slice(&bytes);
            }
        }
    }
}

#[inline]
fn to_nibble(value: u8) -> u16 {
    (value as u16 * 15 + 127) / 255
}

/// Unpack one pixel of any little-endian RGB(A) bit-mask layout into RGBA8.
///
/// A zero alpha mask means the texture is opaque.
pub fn unpack_masked(bytes: &[u8], masks: [u32; 4]) -> [u8; 4] {
    let mut value = 0u32;
    for (i, &b) in bytes.iter().take(4).enumerate() {
        value |= (b as u32) << (8 * i);
    }

    let mut rgba = [0u8; 4];
    for (channel, &mask) in rgba.iter_mut().zip(masks.iter()) {
        *channel = scale_channel(value, mask);
    }
    if masks[3] == 0 {
        rgba[3] = 0xFF;
    }
    rgba
}

fn scale_channel(value: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let max = (mask >> shift) as u64;
    let raw = ((value & mask) >> shift) as u64;
    ((raw * 255 + max / 2) / max) as u8
}

/// Filter used when shrinking mipmap levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipmapFilter {
    /// Linear (tent) filter.
    Triangle,
    /// Windowed sinc filter; the sharpest of the available filters.
    #[default]
    Lanczos,
}

impl MipmapFilter {
    pub(crate) fn filter_type(self) -> FilterType {
        match self {
            Self::Triangle => FilterType::Triangle,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// Options for writing a DDS texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsOptions {
    /// Write a full mip chain down to 1x1.
    pub mipmaps: bool,
    /// Filter for the mip chain.
    pub mipmap_filter: MipmapFilter,
    /// Pixel layout.
    pub format: DdsFormat,
}

impl Default for DdsOptions {
    fn default() -> Self {
        Self {
            mipmaps: true,
            mipmap_filter: MipmapFilter::Lanczos,
            format: DdsFormat::Rgba8,
        }
    }
}

impl DdsOptions {
    /// 16-bit textures with a triangle-filtered mip chain, used for patches
    /// with a separately painted alpha channel.
    pub fn rgba4() -> Self {
        Self {
            mipmaps: true,
            mipmap_filter: MipmapFilter::Triangle,
            format: DdsFormat::Rgba4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_pack_unpack() {
        let mut out = Vec::new();
        DdsFormat::Rgba8.pack(&[10, 20, 30, 40], &mut out);
        assert_eq!(out, [30, 20, 10, 40]);
        assert_eq!(unpack_masked(&out, DdsFormat::Rgba8.masks()), [10, 20, 30, 40]);
    }

    #[test]
    fn test_rgba4_quantizes() {
        let mut out = Vec::new();
        DdsFormat::Rgba4.pack(&[0xFF, 0x88, 0x00, 0xFF], &mut out);
        assert_eq!(out, [0x80, 0xFF]);
        assert_eq!(unpack_masked(&out, DdsFormat::Rgba4.masks()), [0xFF, 0x88, 0x00, 0xFF]);
    }

    #[test]
    fn test_missing_alpha_is_opaque() {
        let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0];
        assert_eq!(unpack_masked(&[1, 2, 3], masks), [3, 2, 1, 0xFF]);
    }
}
