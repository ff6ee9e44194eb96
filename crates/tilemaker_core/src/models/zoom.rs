//! Zoom range (`0-8`, `5`) as accepted by gdal2tiles `-z`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a zoom range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoomRangeError {
    #[error("zoom range is empty")]
    Empty,

    #[error("invalid zoom level '{0}'")]
    InvalidLevel(String),

    #[error("zoom range {min}-{max} is reversed")]
    Reversed { min: u8, max: u8 },
}

/// Inclusive range of zoom levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: u8,
    pub max: u8,
}

impl ZoomRange {
    pub fn new(min: u8, max: u8) -> Result<Self, ZoomRangeError> {
        if min > max {
            return Err(ZoomRangeError::Reversed { min, max });
        }
        Ok(Self { min, max })
    }

    /// Number of zoom levels covered.
    pub fn levels(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0, max: 8 }
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

impl FromStr for ZoomRange {
    type Err = ZoomRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ZoomRangeError::Empty);
        }

        let parse_level = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| ZoomRangeError::InvalidLevel(part.trim().to_string()))
        };

        match s.split_once('-') {
            Some((lo, hi)) => ZoomRange::new(parse_level(lo)?, parse_level(hi)?),
            None => {
                let level = parse_level(s)?;
                ZoomRange::new(level, level)
            }
        }
    }
}
