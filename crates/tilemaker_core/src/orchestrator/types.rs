//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::{TileJob, UploadTarget};
use crate::tools::{CommandRunner, ExternalCommand, ResolvedTools};

use super::errors::{StepError, StepResult};

/// Read-only context passed to pipeline steps.
///
/// Contains the run configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `RunState`.
pub struct Context {
    /// Validated run configuration.
    pub job: TileJob,
    /// Application settings.
    pub settings: Settings,
    /// Run name (used in errors and log file name).
    pub run_name: String,
    /// Executables resolved by preflight.
    pub tools: ResolvedTools,
    /// Upload destination, when an upload was requested.
    pub upload: Option<UploadTarget>,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    /// Executes external commands.
    runner: Box<dyn CommandRunner>,
}

impl Context {
    pub fn new(
        job: TileJob,
        settings: Settings,
        tools: ResolvedTools,
        upload: Option<UploadTarget>,
        logger: Arc<RunLogger>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let run_name = job.name();
        Self {
            job,
            settings,
            run_name,
            tools,
            upload,
            logger,
            runner,
        }
    }

    /// True when commands are only echoed.
    pub fn is_dry_run(&self) -> bool {
        !self.runner.executes()
    }

    /// Echo, run and check one external command.
    ///
    /// Any non-zero exit becomes `StepError::CommandFailed` carrying the
    /// child's exit code.
    pub fn run_command(&self, command: &ExternalCommand) -> StepResult<CommandRecord> {
        self.logger.command(&command.display_line());
        self.logger.command_json(&command.argv());

        let status = self
            .runner
            .run(command)
            .map_err(|e| StepError::spawn_failed(command.tool, e))?;

        if !status.is_success() {
            return Err(StepError::command_failed(command.tool, status.code));
        }

        Ok(CommandRecord {
            argv: command.argv(),
            env: command.env.clone(),
            exit_code: status.code,
        })
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// Each step writes its own section once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run identifier.
    pub run_id: String,
    /// When the run started.
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<DuplicateOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp: Option<CommandRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcode: Option<CommandRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles: Option<TilesOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadOutput>,
}

impl RunState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Whether the working raster was produced by copying the source.
    pub fn copied(&self) -> bool {
        self.duplicate.as_ref().is_some_and(|d| d.copied)
    }
}

/// A command that ran and how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Program followed by arguments.
    pub argv: Vec<String>,
    /// Child-only environment overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
    pub exit_code: Option<i32>,
}

/// Output from the Duplicate step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateOutput {
    /// False when source and working raster are the same file.
    pub copied: bool,
    /// Bytes copied (0 when not copied).
    pub bytes: u64,
}

/// Output from the Tile step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesOutput {
    pub tiles_dir: PathBuf,
    pub command: CommandRecord,
}

/// Output from the Upload step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutput {
    /// `s3://bucket/prefix/` destination.
    pub destination: String,
    /// Sample tile URL under the public base, if one was given.
    pub sample_url: Option<String>,
    pub command: CommandRecord,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (not an error).
    Skipped(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_tracks_copy() {
        let mut state = RunState::new("run-1");
        assert!(!state.copied());

        state.duplicate = Some(DuplicateOutput {
            copied: true,
            bytes: 42,
        });
        assert!(state.copied());
    }

    #[test]
    fn run_state_serializes() {
        let state = RunState::new("run-2");
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"run_id\":\"run-2\""));
        assert!(!json.contains("\"tiles\""));
    }
}
