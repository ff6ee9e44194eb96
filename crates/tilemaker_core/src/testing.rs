//! Test support: a recording command runner and context builders.
//!
//! Lets the pipeline be exercised end to end without GDAL or the AWS CLI
//! installed.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::config::Settings;
use crate::logging::{LogConfig, RunLogger};
use crate::models::{TileJob, UploadTarget};
use crate::orchestrator::Context;
use crate::tools::{CommandRunner, CommandStatus, ExternalCommand, ResolvedTools, Tool};

/// Runner that records every command instead of executing it.
///
/// Clones share the same record, so one clone can go into a `Context`
/// while the test keeps another for assertions.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<ExternalCommand>>>,
    failures: Arc<Mutex<HashMap<Tool, Option<i32>>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `tool` end with `exit_code`
    /// (None simulates a signal).
    pub fn fail_with(&self, tool: Tool, exit_code: Option<i32>) {
        self.failures.lock().insert(tool, exit_code);
    }

    /// Commands run so far, in order.
    pub fn commands(&self) -> Vec<ExternalCommand> {
        self.calls.lock().clone()
    }

    /// Tools invoked so far, in order.
    pub fn tools(&self) -> Vec<Tool> {
        self.calls.lock().iter().map(|c| c.tool).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandStatus> {
        self.calls.lock().push(command.clone());
        match self.failures.lock().get(&command.tool) {
            Some(code) => Ok(CommandStatus { code: *code }),
            None => Ok(CommandStatus::success()),
        }
    }
}

/// Build a context for `job` with default settings and a silent logger.
pub fn context_for(
    job: TileJob,
    upload: Option<UploadTarget>,
    runner: &RecordingRunner,
) -> Context {
    let settings = Settings::default();
    let tools = ResolvedTools::unchecked(&settings.tools);
    let logger = Arc::new(RunLogger::new("test", LogConfig::default(), None));
    Context::new(job, settings, tools, upload, logger, Box::new(runner.clone()))
}

/// Temp dir holding `src.tif` (a few bytes) and an existing `tiles/` dir.
pub fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_raster(&dir.path().join("src.tif"));
    fs::create_dir_all(dir.path().join("tiles")).expect("create tiles dir");
    dir
}

/// Write a small stand-in raster.
pub fn write_raster(path: &Path) {
    fs::write(path, b"II*\0fake-geotiff-payload").expect("write raster");
}

/// Context over a fresh fixture dir: `src.tif` -> `work.tif` -> `tiles/`.
pub fn test_context() -> (Context, RecordingRunner, TempDir) {
    let dir = fixture_dir();
    let job = TileJob::new(
        dir.path().join("src.tif"),
        dir.path().join("work.tif"),
        dir.path().join("tiles"),
    );
    let runner = RecordingRunner::new();
    let ctx = context_for(job, None, &runner);
    (ctx, runner, dir)
}
