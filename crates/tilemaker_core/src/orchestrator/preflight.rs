//! Checks run before any pipeline step.
//!
//! Preflight never spawns a process; it only inspects the search path and
//! the job's upload parameters.

use crate::config::ToolSettings;
use crate::models::{TileJob, UploadTarget};
use crate::tools::{ResolvedTools, Tool, ToolResolver};

use super::errors::PreflightError;

/// Everything preflight established about a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    pub tools: ResolvedTools,
    /// Set only when an upload was requested.
    pub upload: Option<UploadTarget>,
}

/// Resolve the tools a job needs and validate its upload parameters.
///
/// Order: the three GDAL tools, then `aws` (upload runs only), then the
/// upload destination. The first problem found is returned.
pub fn preflight(
    job: &TileJob,
    settings: &ToolSettings,
    resolver: &ToolResolver,
) -> Result<Preflight, PreflightError> {
    let find = |tool: Tool| {
        let program = tool.program(settings);
        resolver.find(program).ok_or_else(|| PreflightError::MissingTool {
            tool,
            program: program.to_string(),
        })
    };

    let gdal_edit = find(Tool::GdalEdit)?;
    let gdal_translate = find(Tool::GdalTranslate)?;
    let gdal2tiles = find(Tool::Gdal2Tiles)?;

    if !job.upload {
        return Ok(Preflight {
            tools: ResolvedTools {
                gdal_edit,
                gdal_translate,
                gdal2tiles,
                aws: None,
            },
            upload: None,
        });
    }

    let aws = find(Tool::Aws)?;

    let missing = job.upload_params.missing();
    if !missing.is_empty() {
        return Err(PreflightError::MissingUploadParams { missing });
    }
    let target = job
        .upload_params
        .to_target()
        .ok_or(PreflightError::MissingUploadParams { missing: Vec::new() })?;

    Ok(Preflight {
        tools: ResolvedTools {
            gdal_edit,
            gdal_translate,
            gdal2tiles,
            aws: Some(aws),
        },
        upload: Some(target),
    })
}
