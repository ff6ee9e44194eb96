//! Command-line arguments.
//!
//! Long flags keep their underscores (`--tiles_out`, `--jpeg_quality`, ...).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tilemaker_core::models::{
    Compression, ResampleMethod, TileJob, UploadParams, ZoomRange, DEFAULT_JPEG_QUALITY,
    DEFAULT_TILE_SIZE, DEFAULT_WEBP_LEVEL,
};

/// Resampling for gdal2tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Resample {
    Nearest,
    Bilinear,
    Cubic,
    Cubicspline,
    Lanczos,
}

impl From<Resample> for ResampleMethod {
    fn from(r: Resample) -> Self {
        match r {
            Resample::Nearest => ResampleMethod::Nearest,
            Resample::Bilinear => ResampleMethod::Bilinear,
            Resample::Cubic => ResampleMethod::Cubic,
            Resample::Cubicspline => ResampleMethod::CubicSpline,
            Resample::Lanczos => ResampleMethod::Lanczos,
        }
    }
}

/// Compression of the intermediate GeoTIFF.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Compress {
    Jpeg,
    Webp,
    None,
}

/// Stamp a raster as Mars, build geodetic XYZ tiles, optionally upload them.
#[derive(Parser, Debug)]
#[command(name = "mars-tilemaker", version, about, long_about = None)]
pub struct Cli {
    /// Source raster (never modified)
    #[arg(long, required_unless_present = "print_config")]
    pub src: Option<PathBuf>,

    /// Working raster, rewritten in place
    #[arg(long, required_unless_present = "print_config")]
    pub work: Option<PathBuf>,

    /// Output directory for tiles
    #[arg(long = "tiles_out", required_unless_present = "print_config")]
    pub tiles_out: Option<PathBuf>,

    /// Zoom levels, e.g. "0-8" or "5"
    #[arg(long, default_value = "0-8")]
    pub zoom: ZoomRange,

    #[arg(long, value_enum, default_value_t = Resample::Bilinear)]
    pub resample: Resample,

    #[arg(long, value_enum, default_value_t = Compress::Jpeg)]
    pub compress: Compress,

    /// JPEG quality, passed to GDAL unchanged
    #[arg(long = "jpeg_quality", default_value_t = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u32,

    /// WEBP level, passed to GDAL unchanged
    #[arg(long = "webp_level", default_value_t = DEFAULT_WEBP_LEVEL)]
    pub webp_level: u32,

    /// Accepted for compatibility; gdal2tiles uses its own tile size
    #[arg(long = "tile_size", default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Upload tiles with the AWS CLI after tiling
    #[arg(long)]
    pub upload: bool,

    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket
    #[arg(long)]
    pub prefix: Option<String>,

    /// S3-compatible endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Public base URL, used to print a sample tile link
    #[arg(long = "public_dev_url")]
    pub public_dev_url: Option<String>,

    /// TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    pub debug: bool,

    /// Print every command without running anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long = "print-config")]
    pub print_config: bool,
}

impl Cli {
    pub fn compression(&self) -> Compression {
        match self.compress {
            Compress::Jpeg => Compression::Jpeg {
                quality: self.jpeg_quality,
            },
            Compress::Webp => Compression::Webp {
                level: self.webp_level,
            },
            Compress::None => Compression::None,
        }
    }

    /// Build the tile job described by these arguments.
    ///
    /// `None` when a path was left out, which clap only allows alongside
    /// `--print-config`.
    pub fn to_job(&self) -> Option<TileJob> {
        let src = self.src.as_ref()?;
        let work = self.work.as_ref()?;
        let tiles_out = self.tiles_out.as_ref()?;
        let mut job = TileJob::new(src, work, tiles_out)
            .with_zoom(self.zoom)
            .with_resample(self.resample.into())
            .with_compression(self.compression());
        job.tile_size = self.tile_size;

        if self.upload {
            job = job.with_upload(UploadParams {
                bucket: self.bucket.clone(),
                prefix: self.prefix.clone(),
                endpoint: self.endpoint.clone(),
                public_dev_url: self.public_dev_url.clone(),
            });
        }
        Some(job)
    }
}
