//! Command runners for external process execution.

use std::io;
use std::process::{Command, Stdio};

use super::command::ExternalCommand;

/// Exit status of a finished child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, or None if the child was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion.
///
/// Steps go through this trait so they can be exercised without the
/// real tools installed.
pub trait CommandRunner: Send + Sync {
    /// Run the command and wait for it to finish.
    ///
    /// Returns `Err` only if the process could not be started.
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandStatus>;

    /// Whether commands are actually executed.
    fn executes(&self) -> bool {
        true
    }
}

/// Runs commands as child processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandStatus> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Child-only overrides; the parent environment is left untouched.
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        tracing::debug!("Spawning {:?}", cmd);

        let status = cmd.status()?;

        tracing::debug!(
            "{} exited with {:?}",
            command.program.display(),
            status.code()
        );

        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Reports success without running anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandStatus> {
        tracing::debug!("Dry run, not executing {}", command.program.display());
        Ok(CommandStatus::success())
    }

    fn executes(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;

    #[test]
    fn status_success() {
        assert!(CommandStatus::success().is_success());
        assert!(!CommandStatus::exited(2).is_success());
        assert!(!CommandStatus { code: None }.is_success());
    }

    #[test]
    fn dry_run_never_executes() {
        let cmd = ExternalCommand::new(Tool::Aws, "/definitely/not/a/real/aws");
        let status = DryRunRunner.run(&cmd).unwrap();
        assert!(status.is_success());
        assert!(!DryRunRunner.executes());
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let cmd = ExternalCommand::new(Tool::GdalEdit, "/definitely/not/a/real/gdal_edit.py");
        assert!(SystemRunner::new().run(&cmd).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn propagates_exit_code_and_child_env() {
        let ok = ExternalCommand::new(Tool::Gdal2Tiles, "sh")
            .env("TILEMAKER_TEST_FLAG", "YES")
            .args(["-c", "test \"$TILEMAKER_TEST_FLAG\" = YES"]);
        assert!(SystemRunner.run(&ok).unwrap().is_success());
        assert!(std::env::var_os("TILEMAKER_TEST_FLAG").is_none());

        let failing = ExternalCommand::new(Tool::Gdal2Tiles, "sh").args(["-c", "exit 3"]);
        assert_eq!(SystemRunner.run(&failing).unwrap(), CommandStatus::exited(3));
    }
}
