//! Batch conversion of texture patches to DDS.
//!
//! Each helper expands a glob pattern, converts every match independently and
//! keeps going when a single file fails. Failures are collected in the
//! returned [`BatchReport`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use condor_common::RasterBuffer;
use condor_dds::{DdsOptions, TextureCodec};
use tracing::{info, warn};

use crate::convert::{load_image, scale, to_rgba};
use crate::{MemoryHost, RasterHost, Result};

/// Outcome of a batch conversion.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written.
    pub converted: Vec<PathBuf>,
    /// Inputs that could not be converted, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Check if every input was converted.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every matching image to `<stem>.dds` with default options.
///
/// Inputs can be anything the `image` crate reads, or DDS files the texture
/// codec can load.
pub fn convert_to_dds<T>(pattern: &str, textures: &T) -> Result<BatchReport>
where
    T: TextureCodec + Sync + ?Sized,
{
    let inputs = expand(pattern)?;
    Ok(run_batch(inputs, PathBuf::as_path, |input| {
        let raster = to_rgba(&load_raster(input, textures)?)?;
        let output = input.with_extension("dds");
        textures.save_compressed_texture(&raster, &output, &DdsOptions::default())?;
        Ok(output)
    }))
}

/// Shrink every matching square texture to `size` x `size`, saving it as
/// `<stem>.dds`. DDS inputs are overwritten in place.
pub fn downsize_dds<T>(pattern: &str, size: u32, textures: &T) -> Result<BatchReport>
where
    T: TextureCodec + Sync + ?Sized,
{
    let inputs = expand(pattern)?;
    Ok(run_batch(inputs, PathBuf::as_path, |input| {
        let raster = load_raster(input, textures)?;
        let resized = to_rgba(&scale(&raster, size, size)?)?;
        let output = input.with_extension("dds");
        textures.save_compressed_texture(&resized, &output, &DdsOptions::default())?;
        Ok(output)
    }))
}

/// Combine colour bitmaps with separate grayscale alpha bitmaps into 16-bit
/// DDS textures.
///
/// The alpha partner of `N.bmp` is `aN.bmp` in the same directory, and it
/// must also match `alpha_pattern`. Colour files without a partner are
/// skipped.
pub fn merge_bmp_alpha_to_dds<T>(
    rgb_pattern: &str,
    alpha_pattern: &str,
    textures: &T,
) -> Result<BatchReport>
where
    T: TextureCodec + Sync + ?Sized,
{
    let alpha_stems: HashSet<String> = expand(alpha_pattern)?
        .iter()
        .filter_map(|p| p.file_stem()?.to_str().map(str::to_string))
        .collect();

    let mut pairs = Vec::new();
    for rgb in expand(rgb_pattern)? {
        let (Some(stem), Some(name)) = (
            rgb.file_stem().and_then(|s| s.to_str()),
            rgb.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        if alpha_stems.contains(&format!("a{stem}")) {
            let alpha = rgb.with_file_name(format!("a{name}"));
            pairs.push((rgb, alpha));
        } else {
            warn!(path = %rgb.display(), "no alpha bitmap, skipping");
        }
    }

    Ok(run_batch(pairs, rgb_of, |(rgb, alpha)| merge_pair(rgb, alpha, textures)))
}

fn rgb_of(pair: &(PathBuf, PathBuf)) -> &Path {
    &pair.0
}

fn merge_pair<T>(rgb_path: &Path, alpha_path: &Path, textures: &T) -> Result<PathBuf>
where
    T: TextureCodec + ?Sized,
{
    info!(path = %rgb_path.display(), "processing file");

    let rgb = load_image(rgb_path)?;
    let alpha = load_image(alpha_path)?;

    let mut host = MemoryHost::new();
    let image = host.new_image(rgb.width(), rgb.height())?;
    let layer = host.new_layer(image, "rgb", rgb, 100.0)?;
    host.composite_alpha(layer, &alpha)?;
    info!(alpha = %alpha_path.display(), "merged alpha");

    let merged = to_rgba(&host.read_pixels(layer)?)?;
    let output = rgb_path.with_extension("dds");
    textures.save_compressed_texture(&merged, &output, &DdsOptions::rgba4())?;

    info!(path = %output.display(), "saved");
    Ok(output)
}

/// Load a texture or image, choosing the reader by extension.
fn load_raster<T>(path: &Path, textures: &T) -> Result<RasterBuffer>
where
    T: TextureCodec + ?Sized,
{
    let is_dds = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dds"));

    if is_dds {
        Ok(textures.load_compressed_texture(path)?)
    } else {
        load_image(path)
    }
}

/// Expand a glob pattern into matching files, sorted.
fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %e.path().display(), error = %e.error(), "unreadable match"),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Run `job` on every item, in parallel with the `parallel` feature.
fn run_batch<I, F>(items: Vec<I>, input_of: fn(&I) -> &Path, job: F) -> BatchReport
where
    I: Sync,
    F: Fn(&I) -> Result<PathBuf> + Sync,
{
    let run = |item: &I| (input_of(item).to_path_buf(), job(item));

    #[cfg(feature = "parallel")]
    let results: Vec<_> = {
        use rayon::prelude::*;
        items.par_iter().map(run).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = items.iter().map(run).collect();

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(output) => report.converted.push(output),
            Err(e) => {
                warn!(path = %input.display(), error = %e, "conversion failed");
                report.failed.push((input, e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use condor_common::Channels;
    use condor_dds::{load_dds, UncompressedDds};

    use crate::convert::save_image;

    fn pattern(dir: &Path, glob: &str) -> String {
        format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), glob)
    }

    fn rgb(width: u32, height: u32, value: u8) -> RasterBuffer {
        let len = (width * height * 3) as usize;
        RasterBuffer::from_pixels(width, height, Channels::RGB, vec![value; len]).unwrap()
    }

    #[test]
    fn test_convert_to_dds() {
        let dir = tempfile::tempdir().unwrap();
        save_image(&rgb(4, 4, 100), &dir.path().join("0001.png")).unwrap();
        save_image(&rgb(2, 2, 50), &dir.path().join("0002.png")).unwrap();

        let report = convert_to_dds(&pattern(dir.path(), "*.png"), &UncompressedDds).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.converted.len(), 2);

        let texture = load_dds(dir.path().join("0001.dds")).unwrap();
        assert_eq!(texture.shape(), (4, 4, 4));
        assert_eq!(texture.pixel(3, 3).unwrap(), &[100, 100, 100, 255]);
    }

    #[test]
    fn test_failures_do_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        save_image(&rgb(4, 4, 1), &dir.path().join("good.png")).unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();

        let report = convert_to_dds(&pattern(dir.path(), "*.png"), &UncompressedDds).unwrap();
        assert_eq!(report.converted, vec![dir.path().join("good.dds")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.path().join("bad.png"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            convert_to_dds("[", &UncompressedDds),
            Err(crate::Error::Pattern(_))
        ));
    }

    #[test]
    fn test_downsize_dds() {
        let dir = tempfile::tempdir().unwrap();
        let source = to_rgba(&rgb(16, 16, 80)).unwrap();
        condor_dds::save_dds(&source, dir.path().join("t0000.dds"), &DdsOptions::default()).unwrap();

        let report = downsize_dds(&pattern(dir.path(), "*.dds"), 4, &UncompressedDds).unwrap();
        assert_eq!(report.converted, vec![dir.path().join("t0000.dds")]);

        let texture = load_dds(dir.path().join("t0000.dds")).unwrap();
        assert_eq!(texture.shape(), (4, 4, 4));
    }

    #[test]
    fn test_merge_bmp_alpha() {
        let dir = tempfile::tempdir().unwrap();
        save_image(&rgb(4, 4, 200), &dir.path().join("1234.bmp")).unwrap();
        save_image(&rgb(4, 4, 10), &dir.path().join("5678.bmp")).unwrap();

        let alpha = RasterBuffer::from_pixels(4, 4, Channels::GRAY, vec![0; 16]).unwrap();
        save_image(&to_rgba(&alpha).unwrap(), &dir.path().join("a1234.bmp")).unwrap();

        let report = merge_bmp_alpha_to_dds(
            &pattern(dir.path(), "[0-9]*.bmp"),
            &pattern(dir.path(), "a*.bmp"),
            &UncompressedDds,
        )
        .unwrap();

        // 5678.bmp has no alpha partner
        assert_eq!(report.converted, vec![dir.path().join("1234.dds")]);
        assert!(!dir.path().join("5678.dds").exists());

        let texture = load_dds(dir.path().join("1234.dds")).unwrap();
        assert_eq!(texture.pixel(0, 0).unwrap(), &[204, 204, 204, 0]);
    }
}
