//! Upload step - copies the tile pyramid to S3-compatible storage.

use crate::models::UploadTarget;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome, UploadOutput};
use crate::tools::{ExternalCommand, Tool};

pub struct UploadStep;

impl UploadStep {
    pub fn new() -> Self {
        Self
    }

    /// `aws s3 cp <tiles_out> s3://<bucket>/<prefix>/ --recursive
    /// --endpoint-url <endpoint> --cache-control <value>`
    pub fn command(ctx: &Context, target: &UploadTarget) -> StepResult<ExternalCommand> {
        let aws = ctx
            .tools
            .aws
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("aws CLI was not resolved"))?;

        Ok(ExternalCommand::new(Tool::Aws, aws)
            .args(["s3", "cp"])
            .path_arg(&ctx.job.tiles_out)
            .arg(target.destination())
            .arg("--recursive")
            .arg("--endpoint-url")
            .arg(target.endpoint.as_str())
            .arg("--cache-control")
            .arg(ctx.settings.upload.cache_control.as_str()))
    }
}

impl Default for UploadStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for UploadStep {
    fn name(&self) -> &str {
        "Upload"
    }

    fn description(&self) -> &str {
        "Upload tiles to object storage with the AWS CLI"
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.upload.is_none() {
            return Ok(());
        }
        if !ctx.is_dry_run() && !ctx.job.tiles_out.is_dir() {
            return Err(StepError::file_not_found(
                ctx.job.tiles_out.display().to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let Some(target) = ctx.upload.as_ref() else {
            return Ok(StepOutcome::Skipped("upload not requested".to_string()));
        };

        let command = ctx.run_command(&Self::command(ctx, target)?)?;
        ctx.logger.success("Upload complete.");

        let sample_url = target.sample_tile_url();
        if let Some(url) = &sample_url {
            ctx.logger.report(&format!("Sample tile: {}", url));
        }

        state.upload = Some(UploadOutput {
            destination: target.destination(),
            sample_url,
            command,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.upload.is_none() {
            return Err(StepError::invalid_output("Upload result not recorded"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TileJob;
    use crate::testing::{context_for, fixture_dir, RecordingRunner};

    fn target(public: Option<&str>) -> UploadTarget {
        UploadTarget::new(
            "nasa",
            "mars_xyz_geodetic/",
            "https://acct.r2.cloudflarestorage.com",
            public.map(str::to_string),
        )
    }

    #[test]
    fn skipped_without_target() {
        let dir = fixture_dir();
        let job = TileJob::new("src.tif", "work.tif", dir.path().join("tiles"));
        let runner = RecordingRunner::new();
        let ctx = context_for(job, None, &runner);
        let mut state = RunState::new("t");

        let step = UploadStep::new();
        step.validate_input(&ctx).unwrap();
        let outcome = step.execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(runner.commands().is_empty());
        assert!(state.upload.is_none());
    }

    #[test]
    fn copies_tiles_recursively_with_cache_header() {
        let dir = fixture_dir();
        let tiles = dir.path().join("tiles");
        let job = TileJob::new("src.tif", "work.tif", &tiles);
        let runner = RecordingRunner::new();
        let ctx = context_for(job, Some(target(None)), &runner);

        let cmd = UploadStep::command(&ctx, ctx.upload.as_ref().unwrap()).unwrap();
        assert_eq!(
            cmd.argv(),
            vec![
                "aws".to_string(),
                "s3".to_string(),
                "cp".to_string(),
                tiles.to_string_lossy().to_string(),
                "s3://nasa/mars_xyz_geodetic/".to_string(),
                "--recursive".to_string(),
                "--endpoint-url".to_string(),
                "https://acct.r2.cloudflarestorage.com".to_string(),
                "--cache-control".to_string(),
                "public, max-age=31536000, immutable".to_string(),
            ]
        );
    }

    #[test]
    fn records_destination_and_sample_url() {
        let dir = fixture_dir();
        let job = TileJob::new("src.tif", "work.tif", dir.path().join("tiles"));
        let runner = RecordingRunner::new();
        let ctx = context_for(job, Some(target(Some("https://pub-1.r2.dev/"))), &runner);
        let mut state = RunState::new("t");

        let step = UploadStep::new();
        step.validate_input(&ctx).unwrap();
        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();

        let upload = state.upload.unwrap();
        assert_eq!(upload.destination, "s3://nasa/mars_xyz_geodetic/");
        assert_eq!(
            upload.sample_url.as_deref(),
            Some("https://pub-1.r2.dev/mars_xyz_geodetic/0/0/0.png")
        );
        assert_eq!(runner.tools(), vec![Tool::Aws]);
    }

    #[test]
    fn aws_failure_propagates_exit_code() {
        let dir = fixture_dir();
        let job = TileJob::new("src.tif", "work.tif", dir.path().join("tiles"));
        let runner = RecordingRunner::new();
        runner.fail_with(Tool::Aws, Some(255));
        let ctx = context_for(job, Some(target(None)), &runner);
        let mut state = RunState::new("t");

        let err = UploadStep::new().execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(
            err,
            StepError::CommandFailed {
                tool: Tool::Aws,
                exit_code: Some(255)
            }
        ));
        assert!(state.upload.is_none());
    }

    #[test]
    fn is_optional() {
        assert!(UploadStep::new().is_optional());
    }
}
