//! Condor maps CLI - convert Condor forest and thermal maps to and from
//! ordinary images, and batch-convert texture patches to DDS.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use condor::convert::{load_image, save_image, to_gray, to_rgba};
use condor::forest::{FOREST_LAYER, FOREST_MAP_SIZE, FOREST_OPACITY};
use condor::prelude::*;
use condor::thermal::{THERMAL_LAYER, THERMAL_OPACITY};

/// Condor maps - forest and thermal map conversion tool
#[derive(Parser)]
#[command(name = "condor-maps")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a forest map as an image
    ForestExport {
        /// Forest map (.for)
        #[arg(short, long)]
        input: PathBuf,

        /// Output image (PNG, BMP, ...)
        #[arg(short, long)]
        output: PathBuf,

        /// Draw the map over its texture patch from ../Textures
        #[arg(short, long)]
        texture: bool,
    },

    /// Import an edited 512x512 image as a forest map
    ForestImport {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output forest map (.for)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show tree cover statistics of a forest map
    ForestInfo {
        /// Forest map (.for)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Export a thermal map as a grayscale image
    ThermalExport {
        /// Thermal map (.tdm)
        #[arg(short, long)]
        input: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a grayscale image as a thermal map
    ThermalImport {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output thermal map (.tdm)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert images matching a glob pattern to DDS
    DdsConvert {
        /// Glob pattern of input images
        #[arg(short, long, env = "CONDOR_PATTERN")]
        pattern: String,
    },

    /// Downsize square textures matching a glob pattern
    DdsDownsize {
        /// Glob pattern of input textures
        #[arg(short, long, env = "CONDOR_PATTERN")]
        pattern: String,

        /// Target edge length in pixels
        #[arg(short, long, default_value_t = 256)]
        size: u32,
    },

    /// Merge RGB bitmaps with their `a`-prefixed alpha bitmaps into DDS
    DdsMergeAlpha {
        /// Glob pattern of RGB bitmaps
        #[arg(short, long)]
        rgb: String,

        /// Glob pattern of alpha bitmaps
        #[arg(short, long)]
        alpha: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::ForestExport {
            input,
            output,
            texture,
        } => {
            cmd_forest_export(&input, &output, texture)?;
        }
        Commands::ForestImport { input, output } => {
            cmd_forest_import(&input, &output)?;
        }
        Commands::ForestInfo { input } => {
            cmd_forest_info(&input)?;
        }
        Commands::ThermalExport { input, output } => {
            cmd_thermal_export(&input, &output)?;
        }
        Commands::ThermalImport { input, output } => {
            cmd_thermal_import(&input, &output)?;
        }
        Commands::DdsConvert { pattern } => {
            cmd_batch("Converting", || convert_to_dds(&pattern, &UncompressedDds))?;
        }
        Commands::DdsDownsize { pattern, size } => {
            cmd_batch("Downsizing", || downsize_dds(&pattern, size, &UncompressedDds))?;
        }
        Commands::DdsMergeAlpha { rgb, alpha } => {
            cmd_batch("Merging", || {
                merge_bmp_alpha_to_dds(&rgb, &alpha, &UncompressedDds)
            })?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_timer(fmt::time::uptime()))
        .init();
}

fn cmd_forest_export(input: &Path, output: &Path, with_texture: bool) -> Result<()> {
    let mut host = MemoryHost::new();

    let image = if with_texture {
        load_forest(&mut host, &UncompressedDds, input)
            .context("Failed to load forest map with texture")?
    } else {
        load_forest_map(&mut host, input).context("Failed to load forest map")?
    };

    let raster = if with_texture {
        host.flatten(image)?
    } else {
        let layer = host
            .find_layer(image, FOREST_LAYER)?
            .context("Forest layer missing")?;
        host.read_pixels(layer)?
    };

    save_image(&raster, output).context("Failed to write output image")?;
    info!(output = %output.display(), "export complete");

    Ok(())
}

fn cmd_forest_import(input: &Path, output: &Path) -> Result<()> {
    let raster = to_rgba(&load_image(input).context("Failed to read input image")?)?;

    if (raster.width(), raster.height()) != (FOREST_MAP_SIZE, FOREST_MAP_SIZE) {
        anyhow::bail!(
            "Forest maps are {0}x{0}, input is {1}x{2}",
            FOREST_MAP_SIZE,
            raster.width(),
            raster.height()
        );
    }

    let mut host = MemoryHost::new();
    let image = host.new_image(FOREST_MAP_SIZE, FOREST_MAP_SIZE)?;
    host.new_layer(image, FOREST_LAYER, raster, FOREST_OPACITY)?;

    save_forest(&host, image, output).context("Failed to write forest map")?;
    info!(output = %output.display(), "import complete");

    Ok(())
}

fn cmd_forest_info(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read forest map")?;
    let stats = ForestStats::from_bytes(&data).context("Failed to parse forest map")?;
    let total = (stats.none + stats.forested()) as f64;

    println!("Forest map: {}", input.display());
    for (cover, count) in [
        (TreeCover::None, stats.none),
        (TreeCover::Coniferous, stats.coniferous),
        (TreeCover::Deciduous, stats.deciduous),
    ] {
        println!(
            "  {:<11} {:>7} cells ({:>5.1}%)",
            cover.to_string(),
            count,
            count as f64 * 100.0 / total
        );
    }

    Ok(())
}

fn cmd_thermal_export(input: &Path, output: &Path) -> Result<()> {
    let mut host = MemoryHost::new();
    let image = load_thermal(&mut host, input).context("Failed to load thermal map")?;

    let layer = host
        .find_layer(image, THERMAL_LAYER)?
        .context("Thermal layer missing")?;
    let raster = host.read_pixels(layer)?;

    save_image(&raster, output).context("Failed to write output image")?;
    info!(
        width = raster.width(),
        height = raster.height(),
        output = %output.display(),
        "export complete"
    );

    Ok(())
}

fn cmd_thermal_import(input: &Path, output: &Path) -> Result<()> {
    let raster = to_gray(&load_image(input).context("Failed to read input image")?)?;

    let mut host = MemoryHost::new();
    let image = host.new_image(raster.width(), raster.height())?;
    host.new_layer(image, THERMAL_LAYER, raster, THERMAL_OPACITY)?;

    save_thermal(&host, image, output).context("Failed to write thermal map")?;
    info!(output = %output.display(), "import complete");

    Ok(())
}

fn cmd_batch<F>(label: &str, run: F) -> Result<()>
where
    F: FnOnce() -> condor::Result<BatchReport>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("{label}..."));
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let report = run();
    pb.finish_and_clear();
    let report = report.context("Batch conversion failed")?;

    for (path, reason) in &report.failed {
        warn!(path = %path.display(), "{reason}");
    }
    println!(
        "Converted {} file(s) in {:?} ({} errors)",
        report.converted.len(),
        start.elapsed(),
        report.failed.len()
    );

    Ok(())
}
