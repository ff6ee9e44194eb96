//! Logging infrastructure for the tilemaker.
//!
//! This module provides:
//! - A per-run logger with console sink and optional file output
//! - Command echo (`→ command`) before every external invocation
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use tilemaker_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::console("mars_tiles", LogConfig::default());
//! logger.phase("Tile");
//! logger.command("gdal2tiles.py -p geodetic --xyz work.tif out");
//! logger.success("Tiles ready");
//! ```

mod run_logger;
mod types;

use std::path::Path;

pub use run_logger::{stdout_sink, RunLogger};
pub use types::{LogConfig, LogLevel, LogSink, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing with stderr output plus a daily log file in `logs_dir`.
///
/// The returned guard must be kept alive for the file writer to flush.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "mars-tilemaker.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(env_filter(default_level))
        .init();

    guard
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)))
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
