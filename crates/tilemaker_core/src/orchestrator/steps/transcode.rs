//! Transcode step - rewrites the working raster as a tiled, compressed GeoTIFF.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::tools::{ExternalCommand, Tool};

pub struct TranscodeStep;

impl TranscodeStep {
    pub fn new() -> Self {
        Self
    }

    /// `gdal_translate -of GTiff -co TILED=YES [-co ...] <work> <work>`
    ///
    /// Input and output are the same file.
    pub fn command(ctx: &Context) -> ExternalCommand {
        let compression_opts = ctx
            .job
            .compression
            .creation_options()
            .into_iter()
            .flat_map(|opt| ["-co".to_string(), opt]);

        ExternalCommand::new(Tool::GdalTranslate, &ctx.tools.gdal_translate)
            .args(["-of", "GTiff", "-co", "TILED=YES"])
            .args(compression_opts)
            .path_arg(&ctx.job.work)
            .path_arg(&ctx.job.work)
    }
}

impl Default for TranscodeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TranscodeStep {
    fn name(&self) -> &str {
        "Transcode"
    }

    fn description(&self) -> &str {
        "Re-encode the working raster with internal tiling and compression"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.is_dry_run() && !ctx.job.work.exists() {
            return Err(StepError::file_not_found(ctx.job.work.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        ctx.logger
            .debug(&format!("Compression: {}", ctx.job.compression));
        let record = ctx.run_command(&Self::command(ctx))?;
        state.transcode = Some(record);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.transcode.is_none() {
            return Err(StepError::invalid_output("Transcode command not recorded"));
        }
        if !ctx.is_dry_run() && !ctx.job.work.exists() {
            return Err(StepError::invalid_output(format!(
                "Working raster missing after transcode: {}",
                ctx.job.work.display()
            )));
        }
        Ok(())
    }
}
