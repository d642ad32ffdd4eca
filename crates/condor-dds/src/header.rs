//! DDS header structures.

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

use crate::DdsFormat;

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    pub const FLAG_CAPS: u32 = 0x1;
    pub const FLAG_HEIGHT: u32 = 0x2;
    pub const FLAG_WIDTH: u32 = 0x4;
    pub const FLAG_PITCH: u32 = 0x8;
    pub const FLAG_PIXEL_FORMAT: u32 = 0x1000;
    pub const FLAG_MIPMAP_COUNT: u32 = 0x2_0000;

    pub const CAPS_COMPLEX: u32 = 0x8;
    pub const CAPS_TEXTURE: u32 = 0x1000;
    pub const CAPS_MIPMAP: u32 = 0x40_0000;

    /// Build the header of an uncompressed texture.
    pub fn uncompressed(width: u32, height: u32, mipmap_count: u32, format: DdsFormat) -> Self {
        let mut header = Self::new_zeroed();

        header.size = Self::SIZE;
        header.flags = Self::FLAG_CAPS
            | Self::FLAG_HEIGHT
            | Self::FLAG_WIDTH
            | Self::FLAG_PITCH
            | Self::FLAG_PIXEL_FORMAT;
        header.height = height;
        header.width = width;
        header.pitch_or_linear_size = width * format.bytes_per_pixel() as u32;
        header.pixel_format = DdsPixelFormat::for_format(format);
        header.caps = Self::CAPS_TEXTURE;

        if mipmap_count > 1 {
            header.flags |= Self::FLAG_MIPMAP_COUNT;
            header.mipmap_count = mipmap_count;
            header.caps |= Self::CAPS_COMPLEX | Self::CAPS_MIPMAP;
        }

        header
    }

    /// Check if the texture is block-compressed.
    pub fn is_compressed(&self) -> bool {
        self.pixel_format.flags & DdsPixelFormat::FLAG_FOURCC != 0
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    pub const FLAG_ALPHA_PIXELS: u32 = 0x1;
    pub const FLAG_FOURCC: u32 = 0x4;
    pub const FLAG_RGB: u32 = 0x40;

    /// Pixel format describing one of the uncompressed layouts.
    pub fn for_format(format: DdsFormat) -> Self {
        let [r, g, b, a] = format.masks();
        Self {
            size: Self::SIZE,
            flags: Self::FLAG_RGB | Self::FLAG_ALPHA_PIXELS,
            four_cc: FourCC([0; 4]),
            rgb_bit_count: format.bytes_per_pixel() as u32 * 8,
            r_bit_mask: r,
            g_bit_mask: g,
            b_bit_mask: b,
            a_bit_mask: a,
        }
    }

    /// Channel masks in RGBA order. Alpha is zero unless the format has it.
    pub fn masks(&self) -> [u32; 4] {
        let alpha = if self.flags & Self::FLAG_ALPHA_PIXELS != 0 {
            self.a_bit_mask
        } else {
            0
        };
        [self.r_bit_mask, self.g_bit_mask, self.b_bit_mask, alpha]
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Calculate the size in bytes of an uncompressed mipmap level.
pub fn mipmap_size(width: u32, height: u32, bytes_per_pixel: usize) -> usize {
    width as usize * height as usize * bytes_per_pixel
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mipmap_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), DdsPixelFormat::SIZE as usize);
    }

    #[test]
    fn test_mipmap_count() {
        assert_eq!(mipmap_count(1, 1), 1);
        assert_eq!(mipmap_count(512, 512), 10);
        assert_eq!(mipmap_count(256, 64), 9);
        assert_eq!(mipmap_count(0, 0), 1);
    }

    #[test]
    fn test_uncompressed_header_flags() {
        let header = DdsHeader::uncompressed(64, 32, 7, DdsFormat::Rgba4);
        let pitch = header.pitch_or_linear_size;
        let caps = header.caps;
        assert_eq!(pitch, 128);
        assert_ne!(caps & DdsHeader::CAPS_MIPMAP, 0);
        assert!(!header.is_compressed());

        let flat = DdsHeader::uncompressed(64, 32, 1, DdsFormat::Rgba8);
        let flags = flat.flags;
        assert_eq!(flags & DdsHeader::FLAG_MIPMAP_COUNT, 0);
    }
}
