//! Configuration management for the tilemaker.
//!
//! This module provides:
//! - TOML-based settings with logical sections (`[tools]`, `[logging]`, `[upload]`)
//! - Defaults for every key, so the settings file is entirely optional
//! - Rendering of the effective settings as commented TOML
//!
//! # Example
//!
//! ```no_run
//! use tilemaker_core::config::ConfigManager;
//!
//! let config = ConfigManager::load("tilemaker.toml").unwrap();
//! println!("gdal2tiles: {}", config.settings().tools.gdal2tiles);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, Settings, ToolSettings, UploadSettings, DEFAULT_CACHE_CONTROL,
};
