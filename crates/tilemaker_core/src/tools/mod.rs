//! External tools: lookup on the search path, command construction and execution.
//!
//! The tilemaker never touches raster data itself. Everything is done by
//! GDAL's command-line tools and, for uploads, the AWS CLI:
//!
//! ```text
//! gdal_edit.py    stamp CRS and bounds in place
//! gdal_translate  re-encode as tiled/compressed GeoTIFF
//! gdal2tiles.py   build the z/x/y tile pyramid
//! aws             copy tiles to S3-compatible storage
//! ```

mod command;
mod resolver;
mod runner;

pub use command::ExternalCommand;
pub use resolver::{ResolvedTools, Tool, ToolResolver};
pub use runner::{CommandRunner, CommandStatus, DryRunRunner, SystemRunner};
