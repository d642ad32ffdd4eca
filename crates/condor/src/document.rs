//! Loading and saving map files as layered images.
//!
//! These functions are the editor-facing side of the codecs: they read a map
//! file, decode it and hand it to a [`RasterHost`] as a named layer, and on
//! save find that layer again and write it back out.

use std::fs;
use std::path::Path;

use condor_dds::TextureCodec;
use condor_forest::{
    decode_forest, encode_forest, texture_path, FOREST_LAYER, FOREST_MAP_SIZE, FOREST_OPACITY,
};
use condor_thermal::{decode_thermal, encode_thermal, THERMAL_LAYER, THERMAL_OPACITY};
use tracing::{debug, info};

use crate::convert::{to_gray, to_rgba};
use crate::{Error, ImageId, RasterHost, Result};

/// Name of the texture layer under a forest map.
pub const TEXTURE_LAYER: &str = "texture";

/// Open a forest map over its texture patch.
///
/// The texture `../Textures/t<N>.dds` next to the map is loaded, scaled to
/// 512x512 and named `texture`. The decoded map is stacked on top as the
/// `forest` layer at 25% opacity. Only the `forest` layer is written back by
/// [`save_forest`].
pub fn load_forest<H, T>(host: &mut H, textures: &T, forest_path: &Path) -> Result<ImageId>
where
    H: RasterHost,
    T: TextureCodec + ?Sized,
{
    let texture_file = texture_path(forest_path)?;
    debug!(texture = %texture_file.display(), "loading texture patch");
    let texture = textures.load_compressed_texture(&texture_file)?;

    let forest = decode_forest(&fs::read(forest_path)?)?;

    let image = host.new_image(texture.width(), texture.height())?;
    host.new_layer(image, TEXTURE_LAYER, texture, 100.0)?;
    host.scale_image(image, FOREST_MAP_SIZE, FOREST_MAP_SIZE)?;
    host.new_layer(image, FOREST_LAYER, forest, FOREST_OPACITY)?;

    info!(path = %forest_path.display(), "loaded forest map");
    Ok(image)
}

/// Open a forest map on its own, without the texture underneath.
pub fn load_forest_map<H: RasterHost>(host: &mut H, forest_path: &Path) -> Result<ImageId> {
    let forest = decode_forest(&fs::read(forest_path)?)?;

    let image = host.new_image(FOREST_MAP_SIZE, FOREST_MAP_SIZE)?;
    host.new_layer(image, FOREST_LAYER, forest, FOREST_OPACITY)?;

    info!(path = %forest_path.display(), "loaded forest map");
    Ok(image)
}

/// Write the `forest` layer of an image as a forest map.
///
/// The layer may have any channel layout; it is expanded to RGBA before
/// encoding, so anything other than pure red or blue is saved as no trees.
pub fn save_forest<H: RasterHost>(host: &H, image: ImageId, forest_path: &Path) -> Result<()> {
    let layer = host
        .find_layer(image, FOREST_LAYER)?
        .ok_or_else(|| Error::MissingLayer(FOREST_LAYER.to_string()))?;

    let raster = to_rgba(&host.read_pixels(layer)?)?;
    let bytes = encode_forest(&raster)?;
    fs::write(forest_path, bytes)?;

    info!(path = %forest_path.display(), "saved forest map");
    Ok(())
}

/// Open a thermal map as a grayscale image with a single `thermal` layer.
pub fn load_thermal<H: RasterHost>(host: &mut H, thermal_path: &Path) -> Result<ImageId> {
    let thermal = decode_thermal(&fs::read(thermal_path)?)?;

    let image = host.new_image(thermal.width(), thermal.height())?;
    host.new_layer(image, THERMAL_LAYER, thermal, THERMAL_OPACITY)?;

    info!(path = %thermal_path.display(), "loaded thermal map");
    Ok(image)
}

/// Write the top-most layer of an image as a thermal map.
///
/// Colour layers are reduced to luma and alpha is discarded, so exactly one
/// byte per sample is written.
pub fn save_thermal<H: RasterHost>(host: &H, image: ImageId, thermal_path: &Path) -> Result<()> {
    let layer = *host.layers(image)?.first().ok_or(Error::EmptyImage)?;

    let raster = to_gray(&host.read_pixels(layer)?)?;
    let bytes = encode_thermal(&raster)?;
    fs::write(thermal_path, bytes)?;

    info!(path = %thermal_path.display(), "saved thermal map");
    Ok(())
}
