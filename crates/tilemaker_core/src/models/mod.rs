//! Data models for the tilemaker.
//!
//! - Enums for resampling and compression choices
//! - Zoom range parsing
//! - The tile job (validated run configuration) and upload target

mod enums;
mod job;
mod zoom;

pub use enums::{Compression, ResampleMethod, DEFAULT_JPEG_QUALITY, DEFAULT_WEBP_LEVEL};
pub use job::{TileJob, UploadParams, UploadTarget, DEFAULT_TILE_SIZE};
pub use zoom::{ZoomRange, ZoomRangeError};
