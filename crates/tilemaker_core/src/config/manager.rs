//! Config manager for loading and rendering settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages the optional settings file.
pub struct ConfigManager {
    /// Path to the config file, if one was given.
    config_path: Option<PathBuf>,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Manager with built-in defaults and no backing file.
    pub fn defaults() -> Self {
        Self {
            config_path: None,
            settings: Settings::default(),
        }
    }

    /// Load settings from the given file.
    ///
    /// Unlike the defaults, an explicit path must exist.
    pub fn load(config_path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_path = config_path.into();
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }

        let content = fs::read_to_string(&config_path)?;
        let settings: Settings = toml::from_str(&content)?;

        tracing::debug!("Loaded settings from {}", config_path.display());

        Ok(Self {
            config_path: Some(config_path),
            settings,
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::defaults()),
        }
    }

    /// Get the config file path (None when running on defaults).
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Logs folder, if file logging is configured.
    pub fn logs_folder(&self) -> Option<PathBuf> {
        let folder = self.settings.logging.logs_folder.trim();
        if folder.is_empty() {
            None
        } else {
            Some(PathBuf::from(folder))
        }
    }

    /// Render the effective settings as commented TOML.
    pub fn render(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# Mars tilemaker configuration\n");
        output.push_str("# Every key is optional; missing keys use the defaults shown here.\n");

        for section in ConfigSection::ALL {
            let (comment, body) = match section {
                ConfigSection::Tools => (
                    "# External tool executables (names on PATH or absolute paths)",
                    toml::to_string_pretty(&self.settings.tools)?,
                ),
                ConfigSection::Logging => (
                    "# Logging configuration",
                    toml::to_string_pretty(&self.settings.logging)?,
                ),
                ConfigSection::Upload => (
                    "# Object storage upload",
                    toml::to_string_pretty(&self.settings.upload)?,
                ),
            };

            output.push('\n');
            output.push_str(comment);
            output.push('\n');
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in body.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }
}
