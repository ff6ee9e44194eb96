//! Pipeline step implementations.
//!
//! Each step handles one stage of turning a source raster into tiles.

mod duplicate;
mod stamp;
mod tile;
mod transcode;
mod upload;

pub use duplicate::{same_file, DuplicateStep};
pub use stamp::{StampStep, MARS_BOUNDS, MARS_PROJ4};
pub use tile::{TileStep, PROJ_IGNORE_CELESTIAL_BODY};
pub use transcode::TranscodeStep;
pub use upload::UploadStep;
