//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::io;

use thiserror::Error;

use crate::tools::Tool;

/// Exit status for failures detected locally (not by a child process).
pub const LOCAL_FAILURE_EXIT_CODE: i32 = 1;

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Preflight checks failed; no step ran.
    #[error("Preflight failed: {0}")]
    Preflight(#[from] PreflightError),

    /// A step failed during execution.
    #[error("Run '{run_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Failed to set up the run (create directories, etc.).
    #[error("Run '{run_name}' setup failed: {message}")]
    SetupFailed { run_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        run_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_name: run_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }

    /// Process exit status for this failure.
    ///
    /// A failed child's own exit code is passed through; everything else
    /// (including children killed by a signal) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::StepFailed {
                source: StepError::CommandFailed {
                    exit_code: Some(code),
                    ..
                },
                ..
            } if (1..=255).contains(code) => *code,
            _ => LOCAL_FAILURE_EXIT_CODE,
        }
    }
}

/// Problems found before any step runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreflightError {
    /// A required executable is not on the search path.
    #[error("{program} not found in PATH (required for {tool})")]
    MissingTool { tool: Tool, program: String },

    /// Upload requested without the full destination.
    #[error("--upload requires --bucket, --prefix, and --endpoint (missing: {})", missing.join(", "))]
    MissingUploadParams { missing: Vec<&'static str> },
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// An external command exited unsuccessfully.
    #[error("{tool} failed with {}", describe_exit(*exit_code))]
    CommandFailed {
        tool: Tool,
        /// None if the child was killed by a signal.
        exit_code: Option<i32>,
    },

    /// An external command could not be started.
    #[error("Failed to start {tool}: {source}")]
    SpawnFailed {
        tool: Tool,
        #[source]
        source: io::Error,
    },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("Required file not found: {path}")]
    FileNotFound { path: String },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl StepError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn command_failed(tool: Tool, exit_code: Option<i32>) -> Self {
        Self::CommandFailed { tool, exit_code }
    }

    pub fn spawn_failed(tool: Tool, source: io::Error) -> Self {
        Self::SpawnFailed { tool, source }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
