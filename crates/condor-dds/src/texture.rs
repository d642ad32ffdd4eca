//! Pluggable texture storage.

use std::path::Path;

use condor_common::RasterBuffer;

use crate::{load_dds, save_dds, DdsOptions, Result};

/// Reads and writes texture patches.
///
/// The map tools only need whole-image reads and writes. A block-compressing
/// encoder can be plugged in by implementing this trait.
pub trait TextureCodec {
    /// Load a texture as an RGBA raster.
    fn load_compressed_texture(&self, path: &Path) -> Result<RasterBuffer>;

    /// Save an RGBA raster as a texture.
    fn save_compressed_texture(
        &self,
        raster: &RasterBuffer,
        path: &Path,
        options: &DdsOptions,
    ) -> Result<()>;
}

/// Texture codec for uncompressed DDS files.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncompressedDds;

impl TextureCodec for UncompressedDds {
    fn load_compressed_texture(&self, path: &Path) -> Result<RasterBuffer> {
        load_dds(path)
    }

    fn save_compressed_texture(
        &self,
        raster: &RasterBuffer,
        path: &Path,
        options: &DdsOptions,
    ) -> Result<()> {
        save_dds(raster, path, options)
    }
}
