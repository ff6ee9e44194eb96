//! Per-run logger with console sink and optional file output.
//!
//! Each run gets its own logger that:
//! - Sends every line to a sink (the console, for the CLI)
//! - Optionally mirrors lines to a dedicated log file
//! - Echoes commands before they run

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, LogSink, MessagePrefix};

/// Per-run logger.
pub struct RunLogger {
    /// Run name for identification.
    run_name: String,
    /// Path to log file (None = sink only).
    log_path: Option<PathBuf>,
    /// File writer (buffered).
    file_writer: Mutex<Option<BufWriter<File>>>,
    /// Line sink.
    sink: Mutex<Option<LogSink>>,
    /// Logging configuration.
    config: LogConfig,
}

impl RunLogger {
    /// Create a logger that only writes to the sink.
    pub fn new(run_name: impl Into<String>, config: LogConfig, sink: Option<LogSink>) -> Self {
        Self {
            run_name: run_name.into(),
            log_path: None,
            file_writer: Mutex::new(None),
            sink: Mutex::new(sink),
            config,
        }
    }

    /// Create a logger that also writes `<log_dir>/<run_name>.log`.
    pub fn with_file(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        sink: Option<LogSink>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            run_name,
            log_path: Some(log_path),
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            sink: Mutex::new(sink),
            config,
        })
    }

    /// Logger that writes each line to stdout.
    pub fn console(run_name: impl Into<String>, config: LogConfig) -> Self {
        Self::new(run_name, config, Some(stdout_sink()))
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Get the log file path, if file output is enabled.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        let msg = MessagePrefix::Debug.format(message);
        self.log(LogLevel::Debug, &msg);
    }

    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Echo a command before it is executed. Never filtered by level.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.report(&msg);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message. Never filtered by level.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.report(&msg);
    }

    /// Output a line regardless of the configured level.
    ///
    /// For run results the user always needs to see (command echo,
    /// upload destination, tile path).
    pub fn report(&self, message: &str) {
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Print a command's argument list as JSON (if enabled).
    pub fn command_json(&self, argv: &[String]) {
        if !self.config.show_options_json {
            return;
        }
        if let Ok(json) = serde_json::to_string_pretty(argv) {
            self.info(&json);
        }
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the logger and release the file.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref sink) = *self.sink.lock() {
            sink(formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sink that prints each line to stdout.
pub fn stdout_sink() -> LogSink {
    Box::new(|line: &str| println!("{}", line))
}

/// Sanitize a string to be safe for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
