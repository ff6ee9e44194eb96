//! Stamp step - assigns the Mars CRS and global bounds with gdal_edit.py.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::tools::{ExternalCommand, Tool};

/// Mars 2000 sphere (radius 3396190 m, no flattening) as a longlat PROJ string.
pub const MARS_PROJ4: &str = "+proj=longlat +a=3396190 +b=3396190 +no_defs";

/// Whole-planet bounds as (ulx, uly, lrx, lry).
pub const MARS_BOUNDS: (i32, i32, i32, i32) = (-180, 90, 180, -90);

pub struct StampStep;

impl StampStep {
    pub fn new() -> Self {
        Self
    }

    /// `gdal_edit.py -a_srs <proj> -a_ullr ulx uly lrx lry <work>`
    pub fn command(ctx: &Context) -> ExternalCommand {
        let (ulx, uly, lrx, lry) = MARS_BOUNDS;
        ExternalCommand::new(Tool::GdalEdit, &ctx.tools.gdal_edit)
            .arg("-a_srs")
            .arg(MARS_PROJ4)
            .arg("-a_ullr")
            .args([ulx, uly, lrx, lry].map(|v| v.to_string()))
            .path_arg(&ctx.job.work)
    }
}

impl Default for StampStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for StampStep {
    fn name(&self) -> &str {
        "Stamp"
    }

    fn description(&self) -> &str {
        "Assign the Mars CRS and global bounds to the working raster"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.is_dry_run() && !ctx.job.work.exists() {
            return Err(StepError::file_not_found(ctx.job.work.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let record = ctx.run_command(&Self::command(ctx))?;
        state.stamp = Some(record);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.stamp.is_none() {
            return Err(StepError::invalid_output("Stamp command not recorded"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, write_raster};

    #[test]
    fn stamps_mars_projection_and_bounds() {
        let (ctx, _runner, _dir) = test_context();
        let cmd = StampStep::command(&ctx);

        let work = ctx.job.work.to_string_lossy().to_string();
        assert_eq!(
            cmd.argv(),
            vec![
                "gdal_edit.py",
                "-a_srs",
                "+proj=longlat +a=3396190 +b=3396190 +no_defs",
                "-a_ullr",
                "-180",
                "90",
                "180",
                "-90",
                work.as_str(),
            ]
        );
        assert!(cmd.env.is_empty());
    }

    #[test]
    fn runs_gdal_edit_and_records_it() {
        let (ctx, runner, _dir) = test_context();
        write_raster(&ctx.job.work);
        let step = StampStep::new();
        let mut state = RunState::new("t");

        step.validate_input(&ctx).unwrap();
        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();

        assert_eq!(runner.tools(), vec![Tool::GdalEdit]);
        assert_eq!(state.stamp.unwrap().exit_code, Some(0));
    }

    #[test]
    fn requires_working_raster() {
        let (ctx, runner, _dir) = test_context();
        assert!(StampStep::new().validate_input(&ctx).is_err());
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn propagates_tool_failure() {
        let (ctx, runner, _dir) = test_context();
        runner.fail_with(Tool::GdalEdit, Some(1));

        let mut state = RunState::new("t");
        let err = StampStep::new().execute(&ctx, &mut state).unwrap_err();

        assert!(matches!(
            err,
            StepError::CommandFailed {
                tool: Tool::GdalEdit,
                exit_code: Some(1)
            }
        ));
        assert!(state.stamp.is_none());
    }
}
