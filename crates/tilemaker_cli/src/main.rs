//! Mars tilemaker - command-line entry point
//!
//! Handles:
//! - Argument parsing
//! - Settings loading and logging initialization
//! - Running the tiling pipeline and mapping failures to exit codes

use std::process;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;

use tilemaker_core::config::ConfigManager;
use tilemaker_core::logging::{init_tracing, init_tracing_with_file, stdout_sink, LogLevel, RunLogger};
use tilemaker_core::orchestrator::{run_job, LOCAL_FAILURE_EXIT_CODE};
use tilemaker_core::tools::{CommandRunner, DryRunRunner, SystemRunner, ToolResolver};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            LOCAL_FAILURE_EXIT_CODE
        }
    };
    process::exit(code);
}

/// Run one invocation and return the process exit status.
fn run(cli: Cli) -> Result<i32> {
    let mut config = ConfigManager::load_optional(cli.config.as_deref())
        .context("Failed to load settings")?;
    if cli.debug {
        config.settings_mut().logging.level = LogLevel::Debug;
    }

    if cli.print_config {
        print!("{}", config.render().context("Failed to render settings")?);
        return Ok(0);
    }

    let settings = config.settings().clone();
    let level = settings.logging.level;

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = match config.logs_folder() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create logs folder {}", dir.display()))?;
            Some(init_tracing_with_file(level, &dir))
        }
        None => {
            init_tracing(level);
            None
        }
    };

    tracing::debug!("mars-tilemaker {}", tilemaker_core::version());
    if let Some(path) = config.path() {
        tracing::debug!("Settings: {}", path.display());
    }

    let job = cli
        .to_job()
        .context("--src, --work and --tiles_out are required")?;
    let log_config = settings.logging.log_config();
    let logger = match config.logs_folder() {
        Some(dir) => RunLogger::with_file(job.name(), &dir, log_config, Some(stdout_sink()))
            .with_context(|| format!("Failed to open run log in {}", dir.display()))?,
        None => RunLogger::console(job.name(), log_config),
    };
    if let Some(path) = logger.log_path() {
        tracing::info!("Run log: {}", path.display());
    }

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner::new())
    };

    match run_job(job, settings, Arc::new(logger), runner, &ToolResolver::new()) {
        Ok(summary) => {
            tracing::debug!(
                "Run {} finished: {} completed, {} skipped",
                summary.state.run_id,
                summary.steps_completed.len(),
                summary.steps_skipped.len()
            );
            Ok(0)
        }
        Err(e) => {
            tracing::error!("{}", e);
            Ok(e.exit_code())
        }
    }
}
