//! Duplicate step - copies the source raster to the working path.
//!
//! The source is never modified; every later step works on the copy.

use std::fs;
use std::io;
use std::path::Path;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, DuplicateOutput, RunState, StepOutcome};

pub struct DuplicateStep;

impl DuplicateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuplicateStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `src` and `work` are the same file on disk.
///
/// Hard links and symlinks to the source count as the source. A working
/// path that does not exist yet cannot be the source.
pub fn same_file(src: &Path, work: &Path) -> io::Result<bool> {
    let src_meta = fs::metadata(src)?;
    let work_meta = match fs::metadata(work) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    same_identity(src, &src_meta, work, &work_meta)
}

#[cfg(unix)]
fn same_identity(
    _src: &Path,
    src_meta: &fs::Metadata,
    _work: &Path,
    work_meta: &fs::Metadata,
) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(src_meta.dev() == work_meta.dev() && src_meta.ino() == work_meta.ino())
}

#[cfg(not(unix))]
fn same_identity(
    src: &Path,
    _src_meta: &fs::Metadata,
    work: &Path,
    _work_meta: &fs::Metadata,
) -> io::Result<bool> {
    Ok(fs::canonicalize(src)? == fs::canonicalize(work)?)
}

impl PipelineStep for DuplicateStep {
    fn name(&self) -> &str {
        "Duplicate"
    }

    fn description(&self) -> &str {
        "Copy the source raster to the working path"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let src = &ctx.job.src;
        if !src.exists() {
            return Err(StepError::file_not_found(src.display().to_string()));
        }
        if !src.is_file() {
            return Err(StepError::invalid_input(format!(
                "Source is not a file: {}",
                src.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let src = &ctx.job.src;
        let work = &ctx.job.work;

        let same = same_file(src, work)
            .map_err(|e| StepError::io_error("resolving source and working paths", e))?;

        if same {
            state.duplicate = Some(DuplicateOutput {
                copied: false,
                bytes: 0,
            });
            return Ok(StepOutcome::Skipped(
                "source and working raster are the same file".to_string(),
            ));
        }

        ctx.logger
            .command(&format!("copy {} {}", src.display(), work.display()));

        if ctx.is_dry_run() {
            state.duplicate = Some(DuplicateOutput {
                copied: false,
                bytes: 0,
            });
            return Ok(StepOutcome::Skipped("dry run".to_string()));
        }

        if let Some(parent) = work.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StepError::io_error("creating working directory", e))?;
        }

        let bytes = fs::copy(src, work)
            .map_err(|e| StepError::io_error("copying source to working raster", e))?;

        tracing::debug!("Copied {} bytes to {}", bytes, work.display());

        state.duplicate = Some(DuplicateOutput {
            copied: true,
            bytes,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        let dup = state
            .duplicate
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Duplicate result not recorded"))?;

        let work_len = fs::metadata(&ctx.job.work)
            .map_err(|e| StepError::io_error("reading working raster metadata", e))?
            .len();

        if dup.copied && work_len != dup.bytes {
            return Err(StepError::invalid_output(format!(
                "Working raster has {} bytes, expected {}",
                work_len, dup.bytes
            )));
        }
        Ok(())
    }
}
