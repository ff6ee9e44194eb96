//! Settings struct with TOML-based sections.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// External tool executables.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Upload behaviour.
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Executable names or paths for the external tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_gdal_edit")]
    pub gdal_edit: String,

    #[serde(default = "default_gdal_translate")]
    pub gdal_translate: String,

    #[serde(default = "default_gdal2tiles")]
    pub gdal2tiles: String,

    #[serde(default = "default_aws")]
    pub aws: String,
}

fn default_gdal_edit() -> String {
    "gdal_edit.py".to_string()
}

fn default_gdal_translate() -> String {
    "gdal_translate".to_string()
}

fn default_gdal2tiles() -> String {
    "gdal2tiles.py".to_string()
}

fn default_aws() -> String {
    "aws".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            gdal_edit: default_gdal_edit(),
            gdal_translate: default_gdal_translate(),
            gdal2tiles: default_gdal2tiles(),
            aws: default_aws(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default tracing level when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,

    /// Prefix run log lines with a timestamp.
    #[serde(default)]
    pub show_timestamps: bool,

    /// Print each command's argument list as JSON before running it.
    #[serde(default)]
    pub show_options_json: bool,

    /// Folder for log files. Empty means console only.
    #[serde(default)]
    pub logs_folder: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            show_timestamps: false,
            show_options_json: false,
            logs_folder: String::new(),
        }
    }
}

impl LoggingSettings {
    /// Run logger configuration for these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            show_timestamps: self.show_timestamps,
            show_options_json: self.show_options_json,
        }
    }
}

/// Upload behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Cache-Control header set on every uploaded tile.
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
}

/// Cache-Control applied to uploaded tiles unless overridden.
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

fn default_cache_control() -> String {
    DEFAULT_CACHE_CONTROL.to_string()
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            cache_control: default_cache_control(),
        }
    }
}

/// Config sections for targeted rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Tools,
    Logging,
    Upload,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "tools",
            ConfigSection::Logging => "logging",
            ConfigSection::Upload => "upload",
        }
    }

    pub const ALL: [ConfigSection; 3] = [
        ConfigSection::Tools,
        ConfigSection::Logging,
        ConfigSection::Upload,
    ];
}
