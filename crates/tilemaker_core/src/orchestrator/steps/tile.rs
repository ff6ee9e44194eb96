//! Tile step - builds the geodetic XYZ tile pyramid with gdal2tiles.py.
//!
//! The stamped CRS describes Mars with Earth-style longlat parameters, which
//! PROJ rejects as a celestial body mismatch unless told to ignore it. The
//! override is set on the gdal2tiles child only.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome, TilesOutput};
use crate::tools::{ExternalCommand, Tool};

/// Environment variable disabling PROJ's celestial body check.
pub const PROJ_IGNORE_CELESTIAL_BODY: &str = "PROJ_IGNORE_CELESTIAL_BODY";

pub struct TileStep;

impl TileStep {
    pub fn new() -> Self {
        Self
    }

    /// `gdal2tiles.py -p geodetic --xyz -z <zoom> -r <resample> <work> <tiles_out>`
    pub fn command(ctx: &Context) -> ExternalCommand {
        ExternalCommand::new(Tool::Gdal2Tiles, &ctx.tools.gdal2tiles)
            .env(PROJ_IGNORE_CELESTIAL_BODY, "YES")
            .args(["-p", "geodetic", "--xyz"])
            .arg("-z")
            .arg(ctx.job.zoom.to_string())
            .arg("-r")
            .arg(ctx.job.resample.as_str())
            .path_arg(&ctx.job.work)
            .path_arg(&ctx.job.tiles_out)
    }
}

impl Default for TileStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TileStep {
    fn name(&self) -> &str {
        "Tile"
    }

    fn description(&self) -> &str {
        "Generate geodetic XYZ tiles with gdal2tiles"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.is_dry_run() && !ctx.job.work.exists() {
            return Err(StepError::file_not_found(ctx.job.work.display().to_string()));
        }
        if ctx.job.tiles_out.exists() && !ctx.job.tiles_out.is_dir() {
            return Err(StepError::invalid_input(format!(
                "Tile output is not a directory: {}",
                ctx.job.tiles_out.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        ctx.logger.info(&format!(
            "Zoom {} ({} levels), resampling {}",
            ctx.job.zoom,
            ctx.job.zoom.levels(),
            ctx.job.resample
        ));
        // gdal2tiles keeps its own default tile size.
        tracing::debug!("tile_size {} accepted but not passed on", ctx.job.tile_size);

        let command = ctx.run_command(&Self::command(ctx))?;
        state.tiles = Some(TilesOutput {
            tiles_dir: ctx.job.tiles_out.clone(),
            command,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        let tiles = state
            .tiles
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Tile results not recorded"))?;

        if !ctx.is_dry_run() && !tiles.tiles_dir.is_dir() {
            return Err(StepError::invalid_output(format!(
                "Tile directory not created: {}",
                tiles.tiles_dir.display()
            )));
        }
        Ok(())
    }
}
