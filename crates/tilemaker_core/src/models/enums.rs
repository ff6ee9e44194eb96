//! Core enums used throughout the tilemaker.

use serde::{Deserialize, Serialize};

/// Resampling method passed to gdal2tiles (`-r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    Nearest,
    #[default]
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
}

impl ResampleMethod {
    /// Every method, in the order gdal2tiles documents them.
    pub const ALL: [ResampleMethod; 5] = [
        ResampleMethod::Nearest,
        ResampleMethod::Bilinear,
        ResampleMethod::Cubic,
        ResampleMethod::CubicSpline,
        ResampleMethod::Lanczos,
    ];

    /// Name as understood by gdal2tiles.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "nearest",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
            ResampleMethod::CubicSpline => "cubicspline",
            ResampleMethod::Lanczos => "lanczos",
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResampleMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown resampling method '{}'", s))
    }
}

/// Compression for the intermediate tiled GeoTIFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Compression {
    /// JPEG at the given quality. GDAL judges the range.
    Jpeg { quality: u32 },
    /// WEBP at the given level.
    Webp { level: u32 },
    /// Tiled, uncompressed.
    None,
}

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u32 = 90;

/// WEBP level used when none is given.
pub const DEFAULT_WEBP_LEVEL: u32 = 80;

impl Default for Compression {
    fn default() -> Self {
        Compression::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Compression {
    /// gdal_translate creation options (`-co` values) for this compression.
    ///
    /// `None` yields no options at all, not even `COMPRESS=NONE`.
    pub fn creation_options(&self) -> Vec<String> {
        match self {
            Compression::Jpeg { quality } => vec![
                "COMPRESS=JPEG".to_string(),
                format!("JPEG_QUALITY={}", quality),
            ],
            Compression::Webp { level } => vec![
                "COMPRESS=WEBP".to_string(),
                format!("WEBP_LEVEL={}", level),
            ],
            Compression::None => Vec::new(),
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::Jpeg { quality } => write!(f, "jpeg (quality {})", quality),
            Compression::Webp { level } => write!(f, "webp (level {})", level),
            Compression::None => write!(f, "none"),
        }
    }
}
