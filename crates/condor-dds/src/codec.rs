//! DDS texture reading and writing.

use std::fs;
use std::path::Path;

use condor_common::{BinaryReader, Channels, IntoBytes, RasterBuffer};
use image::RgbaImage;
use tracing::debug;

use crate::format::unpack_masked;
use crate::header::{mipmap_count, mipmap_size, DdsHeader};
use crate::{DdsOptions, Error, Result, DDS_MAGIC};

/// Encode an RGBA raster as an uncompressed DDS texture.
///
/// With [`DdsOptions::mipmaps`] set, every level down to 1x1 is resampled
/// from the full-size image with the chosen filter.
pub fn encode_dds(raster: &RasterBuffer, options: &DdsOptions) -> Result<Vec<u8>> {
    let (width, height, channels) = raster.shape();
    if channels != Channels::RGBA {
        return Err(Error::UnsupportedChannels(channels));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidHeader(format!("empty {width}x{height} texture")));
    }

    let levels = if options.mipmaps {
        mipmap_count(width, height)
    } else {
        1
    };
    let format = options.format;
    let header = DdsHeader::uncompressed(width, height, levels, format);

    let base = RgbaImage::from_raw(width, height, raster.pixels().to_vec()).ok_or(
        condor_common::Error::Layout {
            expected: mipmap_size(width, height, 4),
            actual: raster.pixels().len(),
        },
    )?;

    let data_len: usize = (0..levels)
        .map(|level| {
            let (w, h) = (level_dim(width, level), level_dim(height, level));
            mipmap_size(w, h, format.bytes_per_pixel())
        })
        .sum();
    let mut output = Vec::with_capacity(DDS_MAGIC.len() + DdsHeader::SIZE as usize + data_len);
    output.extend_from_slice(DDS_MAGIC);
    output.extend_from_slice(header.as_bytes());

    for level in 0..levels {
        let (w, h) = (level_dim(width, level), level_dim(height, level));
        if level == 0 {
            for pixel in base.as_raw().chunks_exact(4) {
                format.pack(pixel, &mut output);
            }
        } else {
            let scaled = image::imageops::resize(&base, w, h, options.mipmap_filter.filter_type());
            for pixel in scaled.as_raw().chunks_exact(4) {
                format.pack(pixel, &mut output);
            }
        }
    }

    debug!(width, height, levels, ?format, "encoded DDS texture");
    Ok(output)
}

/// Decode the top mipmap level of an uncompressed DDS texture into RGBA.
///
/// Block-compressed textures are rejected with [`Error::UnsupportedFormat`].
pub fn decode_dds(data: &[u8]) -> Result<RasterBuffer> {
    let mut reader = BinaryReader::new(data);
    reader.expect_magic(DDS_MAGIC)?;

    let header: DdsHeader = reader.read_struct()?;
    let size = header.size;
    if size != DdsHeader::SIZE {
        return Err(Error::InvalidHeader(format!("header size {size}, expected 124")));
    }

    let pixel_format = header.pixel_format;
    if header.is_compressed() {
        return Err(Error::UnsupportedFormat(pixel_format.four_cc.to_string()));
    }

    let bit_count = pixel_format.rgb_bit_count;
    if bit_count == 0 || bit_count > 32 || bit_count % 8 != 0 {
        return Err(Error::UnsupportedFormat(format!("{bit_count} bits per pixel")));
    }

    let (width, height) = (header.width, header.height);
    let bytes_per_pixel = (bit_count / 8) as usize;
    let expected = mipmap_size(width, height, bytes_per_pixel);
    let available = reader.remaining();
    let body = reader.read_bytes(expected).map_err(|_| Error::Truncated {
        expected,
        actual: available,
    })?;

    let masks = pixel_format.masks();
    let mut pixels = Vec::with_capacity(mipmap_size(width, height, 4));
    for chunk in body.chunks_exact(bytes_per_pixel) {
        pixels.extend_from_slice(&unpack_masked(chunk, masks));
    }

    debug!(width, height, bit_count, "decoded DDS texture");
    Ok(RasterBuffer::from_pixels(width, height, Channels::RGBA, pixels)?)
}

/// Read and decode a DDS file.
pub fn load_dds<P: AsRef<Path>>(path: P) -> Result<RasterBuffer> {
    let data = fs::read(path)?;
    decode_dds(&data)
}

/// Encode a raster and write it as a DDS file.
pub fn save_dds<P: AsRef<Path>>(raster: &RasterBuffer, path: P, options: &DdsOptions) -> Result<()> {
    let data = encode_dds(raster, options)?;
    fs::write(path, data)?;
    Ok(())
}

#[inline]
fn level_dim(dim: u32, level: u32) -> u32 {
    (dim >> level).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DdsFormat, MipmapFilter};

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        let mut raster = RasterBuffer::new(width, height, Channels::RGBA).unwrap();
        for row in 0..height {
            for col in 0..width {
                let px = [(col * 16) as u8, (row * 16) as u8, 0x40, 0xFF];
                raster.set_pixel(row, col, &px).unwrap();
            }
        }
        raster
    }

    #[test]
    fn test_rgba8_round_trip() {
        let raster = gradient(8, 4);
        let options = DdsOptions {
            mipmaps: false,
            ..DdsOptions::default()
        };
        let data = encode_dds(&raster, &options).unwrap();

        assert_eq!(data.len(), 4 + 124 + 8 * 4 * 4);
        assert_eq!(decode_dds(&data).unwrap(), raster);
    }

    #[test]
    fn test_mip_chain_length() {
        let raster = gradient(8, 4);
        let data = encode_dds(&raster, &DdsOptions::rgba4()).unwrap();

        // 8x4, 4x2, 2x1, 1x1 at two bytes per pixel
        assert_eq!(data.len(), 4 + 124 + (32 + 8 + 2 + 1) * 2);

        let mut reader = BinaryReader::new(&data[4..]);
        let header: DdsHeader = reader.read_struct().unwrap();
        let count = header.mipmap_count;
        assert_eq!(count, 4);
    }

    #[test]
    fn test_rgba4_decode_is_close() {
        let raster = gradient(4, 4);
        let options = DdsOptions {
            mipmaps: false,
            mipmap_filter: MipmapFilter::Triangle,
            format: DdsFormat::Rgba4,
        };
        let decoded = decode_dds(&encode_dds(&raster, &options).unwrap()).unwrap();

        for (a, b) in raster.pixels().iter().zip(decoded.pixels()) {
            assert!((*a as i16 - *b as i16).abs() <= 9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_rejects_compressed() {
        let raster = gradient(4, 4);
        let mut data = encode_dds(&raster, &DdsOptions::default()).unwrap();

        // pixel format starts at 4 + 72; its flags and FourCC follow the size
        data[80..84].copy_from_slice(&0x4u32.to_le_bytes());
        data[84..88].copy_from_slice(b"DXT3");

        match decode_dds(&data) {
            Err(Error::UnsupportedFormat(name)) => assert_eq!(name, "DXT3"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_magic_and_truncation() {
        assert!(matches!(decode_dds(b"PNG fake"), Err(Error::Common(_))));

        let raster = gradient(4, 4);
        let data = encode_dds(&raster, &DdsOptions::default()).unwrap();
        assert!(matches!(
            decode_dds(&data[..150]),
            Err(Error::Truncated { expected: 64, actual: 22 })
        ));
    }

    #[test]
    fn test_encode_requires_rgba() {
        let gray = RasterBuffer::new(4, 4, Channels::GRAY).unwrap();
        assert!(matches!(
            encode_dds(&gray, &DdsOptions::default()),
            Err(Error::UnsupportedChannels(1))
        ));
    }

    #[test]
    fn test_file_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t0000.dds");

        let raster = gradient(4, 2);
        save_dds(&raster, &path, &DdsOptions::default()).unwrap();
        assert_eq!(load_dds(&path).unwrap(), raster);
    }
}
