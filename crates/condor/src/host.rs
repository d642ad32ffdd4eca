//! Layered image model used by the map documents.
//!
//! Editors expose images made of named layers with an opacity. The map
//! documents only need a handful of operations on them, collected in
//! [`RasterHost`]. [`MemoryHost`] keeps everything in memory and is what the
//! command-line tool and the batch helpers use.

use condor_common::{Channels, RasterBuffer};

use crate::convert::{luma, scale, to_rgba};
use crate::{Error, Result};

/// Handle to an image owned by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(usize);

/// Handle to a layer of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    image: ImageId,
    index: usize,
}

impl LayerId {
    /// The image this layer belongs to.
    pub fn image(&self) -> ImageId {
        self.image
    }
}

/// The operations map documents need from an image editor.
pub trait RasterHost {
    /// Create an empty image canvas.
    fn new_image(&mut self, width: u32, height: u32) -> Result<ImageId>;

    /// Add a layer on top of the image's existing layers.
    ///
    /// `opacity` is a percentage in `0.0..=100.0`.
    fn new_layer(
        &mut self,
        image: ImageId,
        name: &str,
        raster: RasterBuffer,
        opacity: f32,
    ) -> Result<LayerId>;

    /// Copy a layer's pixels out.
    fn read_pixels(&self, layer: LayerId) -> Result<RasterBuffer>;

    /// Replace a layer's pixels. The shape must match the layer.
    fn write_pixels(&mut self, layer: LayerId, raster: &RasterBuffer) -> Result<()>;

    /// Multiply a layer's alpha by the brightness of `alpha`, adding an
    /// opaque alpha channel first if the layer has none.
    fn composite_alpha(&mut self, layer: LayerId, alpha: &RasterBuffer) -> Result<()>;

    /// Layers of an image, top-most first.
    fn layers(&self, image: ImageId) -> Result<Vec<LayerId>>;

    /// Name of a layer.
    fn layer_name(&self, layer: LayerId) -> Result<&str>;

    /// Resample every layer of an image and the canvas to a new size.
    fn scale_image(&mut self, image: ImageId, width: u32, height: u32) -> Result<()>;

    /// Drop an image and all its layers.
    fn delete_image(&mut self, image: ImageId) -> Result<()>;

    /// Top-most layer with the given name.
    fn find_layer(&self, image: ImageId, name: &str) -> Result<Option<LayerId>> {
        for layer in self.layers(image)? {
            if self.layer_name(layer)? == name {
                return Ok(Some(layer));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone)]
struct HostLayer {
    name: String,
    opacity: f32,
    raster: RasterBuffer,
}

#[derive(Debug, Clone)]
struct HostImage {
    width: u32,
    height: u32,
    /// Bottom-most first.
    layers: Vec<HostLayer>,
}

/// In-memory [`RasterHost`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    images: Vec<Option<HostImage>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas size of an image.
    pub fn image_size(&self, image: ImageId) -> Result<(u32, u32)> {
        let img = self.image(image)?;
        Ok((img.width, img.height))
    }

    /// Opacity of a layer, in percent.
    pub fn layer_opacity(&self, layer: LayerId) -> Result<f32> {
        Ok(self.layer(layer)?.opacity)
    }

    /// Composite all layers bottom to top into one RGBA raster the size of
    /// the canvas. Layers are anchored at the top-left corner.
    pub fn flatten(&self, image: ImageId) -> Result<RasterBuffer> {
        let img = self.image(image)?;
        let mut out = RasterBuffer::new(img.width, img.height, Channels::RGBA)?;

        for layer in &img.layers {
            let src = to_rgba(&layer.raster)?;
            let opacity = (layer.opacity / 100.0).clamp(0.0, 1.0);
            let rows = src.height().min(img.height);
            let cols = src.width().min(img.width);

            for row in 0..rows {
                for col in 0..cols {
                    let s = src.pixel(row, col)?;
                    let offset = out.offset(row, col)?;
                    let d = &mut out.pixels_mut()[offset..offset + 4];
                    blend_over(d, s, opacity);
                }
            }
        }

        Ok(out)
    }

    fn image(&self, image: ImageId) -> Result<&HostImage> {
        self.images
            .get(image.0)
            .and_then(Option::as_ref)
            .ok_or(Error::UnknownImage(image))
    }

    fn image_mut(&mut self, image: ImageId) -> Result<&mut HostImage> {
        self.images
            .get_mut(image.0)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownImage(image))
    }

    fn layer(&self, layer: LayerId) -> Result<&HostLayer> {
        self.image(layer.image)?
            .layers
            .get(layer.index)
            .ok_or(Error::UnknownLayer(layer))
    }

    fn layer_mut(&mut self, layer: LayerId) -> Result<&mut HostLayer> {
        self.image_mut(layer.image)?
            .layers
            .get_mut(layer.index)
            .ok_or(Error::UnknownLayer(layer))
    }
}

impl RasterHost for MemoryHost {
    fn new_image(&mut self, width: u32, height: u32) -> Result<ImageId> {
        let id = ImageId(self.images.len());
        self.images.push(Some(HostImage {
            width,
            height,
            layers: Vec::new(),
        }));
        Ok(id)
    }

    fn new_layer(
        &mut self,
        image: ImageId,
        name: &str,
        raster: RasterBuffer,
        opacity: f32,
    ) -> Result<LayerId> {
        let img = self.image_mut(image)?;
        img.layers.push(HostLayer {
            name: name.to_string(),
            opacity: opacity.clamp(0.0, 100.0),
            raster,
        });
        Ok(LayerId {
            image,
            index: img.layers.len() - 1,
        })
    }

    fn read_pixels(&self, layer: LayerId) -> Result<RasterBuffer> {
        Ok(self.layer(layer)?.raster.clone())
    }

    fn write_pixels(&mut self, layer: LayerId, raster: &RasterBuffer) -> Result<()> {
        let target = self.layer_mut(layer)?;
        if target.raster.shape() != raster.shape() {
            return Err(Error::ShapeMismatch {
                expected: target.raster.shape(),
                actual: raster.shape(),
            });
        }
        target.raster = raster.clone();
        Ok(())
    }

    fn composite_alpha(&mut self, layer: LayerId, alpha: &RasterBuffer) -> Result<()> {
        let target = self.layer_mut(layer)?;
        let (width, height, channels) = target.raster.shape();
        if (alpha.width(), alpha.height()) != (width, height) {
            return Err(Error::ShapeMismatch {
                expected: (width, height, alpha.channels()),
                actual: alpha.shape(),
            });
        }

        let has_alpha = channels == Channels::GRAY_ALPHA || channels == Channels::RGBA;
        let out_channels = if has_alpha { channels } else { channels + 1 };

        let mut pixels = Vec::with_capacity(width as usize * height as usize * out_channels as usize);
        for (px, mask) in target.raster.iter_pixels().zip(alpha.iter_pixels()) {
            let mask = match *mask {
                [v] | [v, _] => v,
                _ => luma(mask[0], mask[1], mask[2]),
            };
            let (color, old_alpha) = if has_alpha {
                px.split_at(px.len() - 1)
            } else {
                (px, &[0xFF][..])
            };
            pixels.extend_from_slice(color);
            pixels.push(mul_alpha(old_alpha[0], mask));
        }

        target.raster = RasterBuffer::from_pixels(width, height, out_channels, pixels)?;
        Ok(())
    }

    fn layers(&self, image: ImageId) -> Result<Vec<LayerId>> {
        let img = self.image(image)?;
        Ok((0..img.layers.len())
            .rev()
            .map(|index| LayerId { image, index })
            .collect())
    }

    fn layer_name(&self, layer: LayerId) -> Result<&str> {
        Ok(&self.layer(layer)?.name)
    }

    fn scale_image(&mut self, image: ImageId, width: u32, height: u32) -> Result<()> {
        let img = self.image_mut(image)?;
        let (old_w, old_h) = (img.width.max(1), img.height.max(1));

        for layer in &mut img.layers {
            let w = scaled_dim(layer.raster.width(), width, old_w);
            let h = scaled_dim(layer.raster.height(), height, old_h);
            layer.raster = scale(&layer.raster, w, h)?;
        }
        img.width = width;
        img.height = height;
        Ok(())
    }

    fn delete_image(&mut self, image: ImageId) -> Result<()> {
        let slot = self
            .images
            .get_mut(image.0)
            .filter(|slot| slot.is_some())
            .ok_or(Error::UnknownImage(image))?;
        *slot = None;
        Ok(())
    }
}

/// Layer size after scaling the canvas from `old` to `new`.
fn scaled_dim(dim: u32, new: u32, old: u32) -> u32 {
    ((dim as u64 * new as u64 + old as u64 / 2) / old as u64).max(1) as u32
}

#[inline]
fn mul_alpha(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Normal "over" blending of an RGBA source onto an RGBA destination.
fn blend_over(dst: &mut [u8], src: &[u8], opacity: f32) {
    let sa = src[3] as f32 / 255.0 * opacity;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }

    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterBuffer {
        let pixels = rgba.iter().copied().cycle().take((width * height * 4) as usize).collect();
        RasterBuffer::from_pixels(width, height, Channels::RGBA, pixels).unwrap()
    }

    #[test]
    fn test_layers_top_most_first() {
        let mut host = MemoryHost::new();
        let image = host.new_image(2, 2).unwrap();
        let bottom = host.new_layer(image, "texture", solid(2, 2, [1, 1, 1, 255]), 100.0).unwrap();
        let top = host.new_layer(image, "forest", solid(2, 2, [2, 2, 2, 255]), 25.0).unwrap();

        assert_eq!(host.layers(image).unwrap(), vec![top, bottom]);
        assert_eq!(host.find_layer(image, "texture").unwrap(), Some(bottom));
        assert_eq!(host.find_layer(image, "thermal").unwrap(), None);
        assert_eq!(host.layer_opacity(top).unwrap(), 25.0);
    }

    #[test]
    fn test_write_pixels_checks_shape() {
        let mut host = MemoryHost::new();
        let image = host.new_image(2, 2).unwrap();
        let layer = host.new_layer(image, "a", solid(2, 2, [0; 4]), 100.0).unwrap();

        let replacement = solid(2, 2, [9, 9, 9, 9]);
        host.write_pixels(layer, &replacement).unwrap();
        assert_eq!(host.read_pixels(layer).unwrap(), replacement);

        let wrong = RasterBuffer::new(2, 2, Channels::GRAY).unwrap();
        assert!(matches!(
            host.write_pixels(layer, &wrong),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_composite_alpha_adds_channel() {
        let mut host = MemoryHost::new();
        let image = host.new_image(2, 1).unwrap();
        let rgb = RasterBuffer::from_pixels(2, 1, Channels::RGB, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let layer = host.new_layer(image, "rgb", rgb, 100.0).unwrap();

        let mask = RasterBuffer::from_pixels(2, 1, Channels::GRAY, vec![0, 200]).unwrap();
        host.composite_alpha(layer, &mask).unwrap();

        assert_eq!(
            host.read_pixels(layer).unwrap().pixels(),
            &[10, 20, 30, 0, 40, 50, 60, 200]
        );
    }

    #[test]
    fn test_composite_alpha_multiplies_existing() {
        let mut host = MemoryHost::new();
        let image = host.new_image(1, 1).unwrap();
        let layer = host.new_layer(image, "rgba", solid(1, 1, [1, 2, 3, 128]), 100.0).unwrap();

        let mask = solid(1, 1, [255, 255, 255, 255]);
        host.composite_alpha(layer, &mask).unwrap();
        assert_eq!(host.read_pixels(layer).unwrap().pixels(), &[1, 2, 3, 128]);

        let small = RasterBuffer::new(2, 2, Channels::GRAY).unwrap();
        assert!(host.composite_alpha(layer, &small).is_err());
    }

    #[test]
    fn test_scale_image() {
        let mut host = MemoryHost::new();
        let image = host.new_image(8, 8).unwrap();
        let layer = host.new_layer(image, "texture", solid(8, 8, [5, 5, 5, 255]), 100.0).unwrap();

        host.scale_image(image, 4, 2).unwrap();
        assert_eq!(host.image_size(image).unwrap(), (4, 2));
        assert_eq!(host.read_pixels(layer).unwrap().shape(), (4, 2, 4));
    }

    #[test]
    fn test_flatten_blends_opacity() {
        let mut host = MemoryHost::new();
        let image = host.new_image(1, 1).unwrap();
        host.new_layer(image, "texture", solid(1, 1, [0, 0, 0, 255]), 100.0).unwrap();
        host.new_layer(image, "forest", solid(1, 1, [255, 0, 0, 255]), 25.0).unwrap();

        let flat = host.flatten(image).unwrap();
        assert_eq!(flat.pixels(), &[64, 0, 0, 255]);
    }

    #[test]
    fn test_delete_image() {
        let mut host = MemoryHost::new();
        let image = host.new_image(1, 1).unwrap();
        host.delete_image(image).unwrap();

        assert!(matches!(host.layers(image), Err(Error::UnknownImage(_))));
        assert!(host.delete_image(image).is_err());
    }
}
