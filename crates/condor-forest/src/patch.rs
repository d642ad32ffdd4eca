//! Texture patch pairing.
//!
//! Condor keeps forest maps and terrain textures in sibling directories of a
//! landscape. Forest map `Forests/<N>.for` belongs to texture
//! `Textures/t<N>.dds`.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name of the texture directory next to the forest directory.
pub const TEXTURE_DIR: &str = "Textures";

/// Path of the texture patch that belongs to a forest map.
///
/// ```
/// use std::path::Path;
/// use condor_forest::texture_path;
///
/// let texture = texture_path(Path::new("Landscapes/Alps/Forests/0204.for")).unwrap();
/// assert_eq!(texture, Path::new("Landscapes/Alps/Forests/../Textures/t0204.dds"));
/// ```
pub fn texture_path(forest_path: &Path) -> Result<PathBuf> {
    let patch = forest_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::InvalidPatchName(forest_path.to_path_buf()))?;

    let dir = forest_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join("..").join(TEXTURE_DIR).join(format!("t{patch}.dds")))
}
