//! Conversions between raster buffers, channel layouts and `image` types.

use std::path::Path;

use condor_common::{Channels, RasterBuffer};
use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::Result;

/// Rec. 601 luma of an RGB colour.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Expand any channel layout to RGBA. Missing alpha becomes opaque.
pub fn to_rgba(raster: &RasterBuffer) -> Result<RasterBuffer> {
    let (width, height, channels) = raster.shape();
    if channels == Channels::RGBA {
        return Ok(raster.clone());
    }

    let mut pixels = Vec::with_capacity(raster.pixels().len() / channels as usize * 4);
    for px in raster.iter_pixels() {
        let rgba = match *px {
            [v] => [v, v, v, 0xFF],
            [v, a] => [v, v, v, a],
            [r, g, b] => [r, g, b, 0xFF],
            _ => [px[0], px[1], px[2], px[3]],
        };
        pixels.extend_from_slice(&rgba);
    }

    Ok(RasterBuffer::from_pixels(width, height, Channels::RGBA, pixels)?)
}

/// Reduce any channel layout to a single luma channel. Alpha is dropped.
pub fn to_gray(raster: &RasterBuffer) -> Result<RasterBuffer> {
    let (width, height, channels) = raster.shape();
    if channels == Channels::GRAY {
        return Ok(raster.clone());
    }

    let pixels = raster
        .iter_pixels()
        .map(|px| match *px {
            [v, ..] if px.len() <= 2 => v,
            _ => luma(px[0], px[1], px[2]),
        })
        .collect();

    Ok(RasterBuffer::from_pixels(width, height, Channels::GRAY, pixels)?)
}

/// Take ownership of a decoded image, keeping 8-bit layouts as they are.
/// Deeper or float images are converted to RGBA8.
pub fn from_dynamic(image: DynamicImage) -> Result<RasterBuffer> {
    let (width, height) = (image.width(), image.height());
    let (channels, pixels) = match image {
        DynamicImage::ImageLuma8(buf) => (Channels::GRAY, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (Channels::GRAY_ALPHA, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (Channels::RGB, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (Channels::RGBA, buf.into_raw()),
        other => (Channels::RGBA, other.to_rgba8().into_raw()),
    };

    Ok(RasterBuffer::from_pixels(width, height, channels, pixels)?)
}

/// Wrap a raster in the matching `image` buffer type.
pub fn to_dynamic(raster: &RasterBuffer) -> Result<DynamicImage> {
    let (width, height, channels) = raster.shape();
    let pixels = raster.pixels().to_vec();

    let image = match channels {
        Channels::GRAY => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        Channels::GRAY_ALPHA => {
            GrayAlphaImage::from_raw(width, height, pixels).map(DynamicImage::ImageLumaA8)
        }
        Channels::RGB => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
    };

    image.ok_or_else(|| {
        condor_common::Error::Layout {
            expected: width as usize * height as usize * channels as usize,
            actual: raster.pixels().len(),
        }
        .into()
    })
}

/// Resample a raster to new dimensions with cubic interpolation.
pub fn scale(raster: &RasterBuffer, width: u32, height: u32) -> Result<RasterBuffer> {
    if raster.width() == width && raster.height() == height {
        return Ok(raster.clone());
    }
    let scaled = to_dynamic(raster)?.resize_exact(width, height, FilterType::CatmullRom);
    from_dynamic(scaled)
}

/// Read any image file the `image` crate understands.
pub fn load_image(path: &Path) -> Result<RasterBuffer> {
    from_dynamic(image::open(path)?)
}

/// Write a raster in the format implied by the file extension.
pub fn save_image(raster: &RasterBuffer, path: &Path) -> Result<()> {
    to_dynamic(raster)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
    }

    #[test]
    fn test_to_rgba_expands() {
        let gray = RasterBuffer::from_pixels(2, 1, Channels::GRAY_ALPHA, vec![10, 20, 30, 40]).unwrap();
        let rgba = to_rgba(&gray).unwrap();
        assert_eq!(rgba.pixels(), &[10, 10, 10, 20, 30, 30, 30, 40]);

        let rgb = RasterBuffer::from_pixels(1, 1, Channels::RGB, vec![1, 2, 3]).unwrap();
        assert_eq!(to_rgba(&rgb).unwrap().pixels(), &[1, 2, 3, 255]);
    }

    #[test]
    fn test_to_gray_drops_alpha() {
        let rgba = RasterBuffer::from_pixels(1, 1, Channels::RGBA, vec![200, 200, 200, 0]).unwrap();
        assert_eq!(to_gray(&rgba).unwrap().pixels(), &[200]);

        let gray_alpha = RasterBuffer::from_pixels(1, 1, Channels::GRAY_ALPHA, vec![7, 9]).unwrap();
        assert_eq!(to_gray(&gray_alpha).unwrap().pixels(), &[7]);
    }

    #[test]
    fn test_dynamic_keeps_layout() {
        let raster = RasterBuffer::from_pixels(2, 2, Channels::GRAY, vec![1, 2, 3, 4]).unwrap();
        let image = to_dynamic(&raster).unwrap();
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
        assert_eq!(from_dynamic(image).unwrap(), raster);
    }

    #[test]
    fn test_scale_dimensions() {
        let raster = RasterBuffer::new(8, 4, Channels::RGBA).unwrap();
        let scaled = scale(&raster, 4, 2).unwrap();
        assert_eq!(scaled.shape(), (4, 2, 4));
    }
}
