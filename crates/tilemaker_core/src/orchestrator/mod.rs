//! Pipeline orchestrator for turning a raster into Mars tiles.
//!
//! This module provides the infrastructure for running the tiling
//! pipeline. A run is a preflight check followed by a fixed sequence of
//! steps that validate, execute, and record their results.
//!
//! # Architecture
//!
//! ```text
//! preflight (tools on PATH, upload destination)
//! Pipeline
//!     ├── Step: Duplicate
//!     ├── Step: Stamp
//!     ├── Step: Transcode
//!     ├── Step: Tile
//!     └── Step: Upload (optional)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tilemaker_core::orchestrator::run_job;
//!
//! let summary = run_job(job, settings, logger, Box::new(SystemRunner), &ToolResolver::new())?;
//! println!("Tiles at {}", summary.tiles_dir.display());
//! ```

mod errors;
mod pipeline;
mod preflight;
mod step;
pub mod steps;
mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use errors::{
    PipelineError, PipelineResult, PreflightError, StepError, StepResult,
    LOCAL_FAILURE_EXIT_CODE,
};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use preflight::{preflight, Preflight};
pub use step::PipelineStep;
pub use steps::{DuplicateStep, StampStep, TileStep, TranscodeStep, UploadStep};
pub use types::{
    CommandRecord, Context, DuplicateOutput, RunState, StepOutcome, TilesOutput, UploadOutput,
};

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::TileJob;
use crate::tools::{CommandRunner, ToolResolver};

/// Create a standard pipeline with all steps in the correct order.
///
/// 1. Duplicate - copy the source raster to the working path
/// 2. Stamp - assign the Mars CRS and bounds (gdal_edit.py)
/// 3. Transcode - tiled, compressed GeoTIFF in place (gdal_translate)
/// 4. Tile - geodetic XYZ pyramid (gdal2tiles.py)
/// 5. Upload - recursive copy to object storage (aws), if requested
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DuplicateStep::new())
        .with_step(StampStep::new())
        .with_step(TranscodeStep::new())
        .with_step(TileStep::new())
        .with_step(UploadStep::new())
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Absolute path of the tile directory.
    pub tiles_dir: PathBuf,
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
    pub state: RunState,
}

/// Run a complete job: preflight, then the standard pipeline.
///
/// Nothing is spawned if preflight fails. The tile directory is created
/// before the first step; on failure the working raster and any partial
/// tiles are left in place.
pub fn run_job(
    job: TileJob,
    settings: Settings,
    logger: Arc<RunLogger>,
    runner: Box<dyn CommandRunner>,
    resolver: &ToolResolver,
) -> PipelineResult<RunSummary> {
    let run_name = job.name();
    tracing::debug!("Starting run '{}'", logger.run_name());

    let checked = preflight(&job, &settings.tools, resolver).map_err(|e| {
        logger.error(&e.to_string());
        PipelineError::from(e)
    })?;
    tracing::debug!("Preflight passed: {:?}", checked.tools);

    if runner.executes() {
        fs::create_dir_all(&job.tiles_out).map_err(|e| {
            let message = format!("creating {}: {}", job.tiles_out.display(), e);
            logger.error(&message);
            PipelineError::setup_failed(&run_name, message)
        })?;
    }

    let ctx = Context::new(
        job,
        settings,
        checked.tools,
        checked.upload,
        Arc::clone(&logger),
        runner,
    );

    let run_id = format!("{}-{}", run_name, chrono::Local::now().format("%Y%m%d-%H%M%S"));
    let mut state = RunState::new(run_id);

    let result = create_standard_pipeline().run(&ctx, &mut state)?;

    ctx.logger.debug(&format!(
        "{} steps. Completed: [{}]  Skipped: [{}]",
        result.total_steps(),
        result.steps_completed.join(", "),
        result.steps_skipped.join(", ")
    ));

    let tiles_dir = resolve_path(&ctx.job.tiles_out);
    logger.success(&format!("Done. Tiles ready at: {}", tiles_dir.display()));
    logger.flush();

    Ok(RunSummary {
        tiles_dir,
        steps_completed: result.steps_completed,
        steps_skipped: result.steps_skipped,
        state,
    })
}

/// Absolute form of `path`, following symlinks when it exists.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogConfig, LogLevel};
    use crate::models::UploadParams;
    use crate::testing::{fixture_dir, RecordingRunner};
    use crate::tools::{DryRunRunner, Tool};
    use parking_lot::Mutex;
    use tempfile::TempDir;

    fn gdal_bin() -> (TempDir, ToolResolver) {
        let dir = tempfile::tempdir().unwrap();
        for name in ["gdal_edit.py", "gdal_translate", "gdal2tiles.py", "aws"] {
            let path = dir.path().join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
        let resolver = ToolResolver::with_search_path(dir.path().as_os_str());
        (dir, resolver)
    }

    fn captured_logger() -> (Arc<RunLogger>, Arc<Mutex<Vec<String>>>) {
        captured_logger_with(LogConfig::default())
    }

    fn captured_logger_with(config: LogConfig) -> (Arc<RunLogger>, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let logger = RunLogger::new(
            "test",
            config,
            Some(Box::new(move |line: &str| sink_lines.lock().push(line.to_string()))),
        );
        (Arc::new(logger), lines)
    }

    #[test]
    fn standard_pipeline_order() {
        let pipeline = create_standard_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["Duplicate", "Stamp", "Transcode", "Tile", "Upload"]
        );
    }

    #[test]
    fn runs_all_tools_in_order_and_reports_path() {
        let dir = fixture_dir();
        let (_bin, resolver) = gdal_bin();
        let job = TileJob::new(
            dir.path().join("src.tif"),
            dir.path().join("work.tif"),
            dir.path().join("out"),
        );
        let runner = RecordingRunner::new();
        let (logger, lines) = captured_logger();

        let summary = run_job(
            job,
            Settings::default(),
            logger,
            Box::new(runner.clone()),
            &resolver,
        )
        .unwrap();

        assert_eq!(
            runner.tools(),
            vec![Tool::GdalEdit, Tool::GdalTranslate, Tool::Gdal2Tiles]
        );
        assert_eq!(summary.steps_skipped, vec!["Upload"]);
        assert_eq!(
            summary.tiles_dir,
            fs::canonicalize(dir.path().join("out")).unwrap()
        );
        assert!(lines
            .lock()
            .iter()
            .any(|l| l.contains("Done. Tiles ready at:")));
    }

    #[test]
    fn error_level_still_echoes_commands_and_tile_path() {
        let dir = fixture_dir();
        let (_bin, resolver) = gdal_bin();
        let job = TileJob::new(
            dir.path().join("src.tif"),
            dir.path().join("work.tif"),
            dir.path().join("out"),
        );
        let runner = RecordingRunner::new();
        let (logger, lines) = captured_logger_with(LogConfig {
            level: LogLevel::Error,
            ..LogConfig::default()
        });

        run_job(
            job,
            Settings::default(),
            logger,
            Box::new(runner),
            &resolver,
        )
        .unwrap();

        let lines = lines.lock();
        let echoed: Vec<&String> = lines.iter().filter(|l| l.starts_with("→ ")).collect();
        assert_eq!(echoed.len(), 3);
        assert!(echoed[0].contains("gdal_edit.py"));
        assert!(echoed[2].contains("gdal2tiles.py"));
        assert!(lines.iter().any(|l| l.contains("Done. Tiles ready at:")));
        assert!(!lines.iter().any(|l| l.starts_with("===")));
    }

    #[test]
    fn preflight_failure_spawns_nothing() {
        let dir = fixture_dir();
        let (_bin, resolver) = gdal_bin();
        let job = TileJob::new(
            dir.path().join("src.tif"),
            dir.path().join("work.tif"),
            dir.path().join("out"),
        )
        .with_upload(UploadParams {
            bucket: Some("nasa".to_string()),
            ..Default::default()
        });
        let runner = RecordingRunner::new();
        let (logger, _lines) = captured_logger();

        let err = run_job(
            job,
            Settings::default(),
            logger,
            Box::new(runner.clone()),
            &resolver,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(runner.commands().is_empty());
        assert!(!dir.path().join("work.tif").exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn failing_tool_stops_run_with_its_code() {
        let dir = fixture_dir();
        let (_bin, resolver) = gdal_bin();
        let job = TileJob::new(
            dir.path().join("src.tif"),
            dir.path().join("work.tif"),
            dir.path().join("out"),
        );
        let runner = RecordingRunner::new();
        runner.fail_with(Tool::GdalTranslate, Some(3));
        let (logger, _lines) = captured_logger();

        let err = run_job(
            job,
            Settings::default(),
            logger,
            Box::new(runner.clone()),
            &resolver,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(runner.tools(), vec![Tool::GdalEdit, Tool::GdalTranslate]);
        // Working raster left for inspection.
        assert!(dir.path().join("work.tif").exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = fixture_dir();
        let (_bin, resolver) = gdal_bin();
        let job = TileJob::new(
            dir.path().join("src.tif"),
            dir.path().join("work.tif"),
            dir.path().join("out"),
        );
        let (logger, lines) = captured_logger();

        let summary = run_job(
            job,
            Settings::default(),
            logger,
            Box::new(DryRunRunner),
            &resolver,
        )
        .unwrap();

        assert!(!dir.path().join("work.tif").exists());
        assert!(!dir.path().join("out").exists());
        assert!(summary.steps_skipped.contains(&"Duplicate".to_string()));
        let lines = lines.lock();
        assert!(lines.iter().any(|l| l.contains("gdal2tiles.py")));
    }

    #[test]
    fn resolves_relative_paths_against_cwd() {
        let resolved = resolve_path(Path::new("no-such-tiles-dir"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("no-such-tiles-dir"));
    }
}
