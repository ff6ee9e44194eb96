//! Tile job (run configuration) and upload target.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::{Compression, ResampleMethod};
use super::zoom::ZoomRange;

/// Tile size gdal2tiles uses unless told otherwise.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Configuration for one tiling run.
///
/// Built once from the command line and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileJob {
    /// Input raster. Never modified.
    pub src: PathBuf,
    /// Working raster, rewritten in place by the stamp and transcode steps.
    pub work: PathBuf,
    /// Output directory for the tile pyramid.
    pub tiles_out: PathBuf,
    /// Zoom levels to generate.
    pub zoom: ZoomRange,
    /// Resampling used by gdal2tiles.
    pub resample: ResampleMethod,
    /// Compression of the intermediate GeoTIFF.
    pub compression: Compression,
    /// Accepted for compatibility; not passed to gdal2tiles.
    pub tile_size: u32,
    /// Whether an upload was requested.
    pub upload: bool,
    /// Upload parameters as given (possibly incomplete).
    #[serde(default)]
    pub upload_params: UploadParams,
}

impl TileJob {
    /// Create a job with default zoom, resampling and compression.
    pub fn new(
        src: impl Into<PathBuf>,
        work: impl Into<PathBuf>,
        tiles_out: impl Into<PathBuf>,
    ) -> Self {
        Self {
            src: src.into(),
            work: work.into(),
            tiles_out: tiles_out.into(),
            zoom: ZoomRange::default(),
            resample: ResampleMethod::default(),
            compression: Compression::default(),
            tile_size: DEFAULT_TILE_SIZE,
            upload: false,
            upload_params: UploadParams::default(),
        }
    }

    pub fn with_zoom(mut self, zoom: ZoomRange) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_resample(mut self, resample: ResampleMethod) -> Self {
        self.resample = resample;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Request an upload with the given parameters.
    pub fn with_upload(mut self, params: UploadParams) -> Self {
        self.upload = true;
        self.upload_params = params;
        self
    }

    /// Short name used for log files.
    pub fn name(&self) -> String {
        self.tiles_out
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "tiles".to_string())
    }
}

/// Upload parameters as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadParams {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub endpoint: Option<String>,
    pub public_dev_url: Option<String>,
}

impl UploadParams {
    /// Names of the required parameters that are missing or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.bucket) {
            missing.push("--bucket");
        }
        if blank(&self.prefix) {
            missing.push("--prefix");
        }
        if blank(&self.endpoint) {
            missing.push("--endpoint");
        }
        missing
    }

    /// Turn complete parameters into a target. Returns `None` if any
    /// required parameter is missing.
    pub fn to_target(&self) -> Option<UploadTarget> {
        if !self.missing().is_empty() {
            return None;
        }
        Some(UploadTarget::new(
            self.bucket.clone()?,
            self.prefix.clone()?,
            self.endpoint.clone()?,
            self.public_dev_url.clone(),
        ))
    }
}

/// Validated object-storage destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub bucket: String,
    /// Prefix inside the bucket, without trailing slash.
    pub prefix: String,
    pub endpoint: String,
    pub public_dev_url: Option<String>,
}

impl UploadTarget {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        endpoint: impl Into<String>,
        public_dev_url: Option<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into().trim_end_matches('/').to_string(),
            endpoint: endpoint.into(),
            public_dev_url,
        }
    }

    /// `s3://bucket/prefix/` destination for `aws s3 cp`.
    pub fn destination(&self) -> String {
        format!("s3://{}/{}/", self.bucket, self.prefix)
    }

    /// URL of the zoom-0 tile under the public base URL, if one was given.
    pub fn sample_tile_url(&self) -> Option<String> {
        self.public_dev_url.as_ref().map(|base| {
            format!("{}/{}/0/0/0.png", base.trim_end_matches('/'), self.prefix)
        })
    }
}
