//! Tilemaker Core - Backend logic for the Mars tilemaker
//!
//! This crate sequences the external GDAL tools (and optionally the AWS CLI)
//! that turn a source raster into Mars-stamped XYZ tiles. It has no CLI
//! dependencies and can be driven by any front end.

pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
