//! Process execution primitive.
//!
//! Everything the hook context learns about a repository comes from running
//! external commands (`git`, `wc`) through a [`CommandRunner`]. The runner is
//! injected so tests can count or script invocations, and so no caller ever
//! depends on the process-wide working directory: the directory is always an
//! explicit argument.

use std::path::Path;
use std::process::Command;

use crate::error::HooklineError;

/// Exit status and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an external command to completion and captures its output.
pub trait CommandRunner {
    /// Runs `argv[0]` with the remaining elements as arguments, inside `cwd`.
    ///
    /// A non-zero exit status is *not* an error; it is reported through
    /// [`CommandOutput::status`]. Only a failure to launch the program is.
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput, HooklineError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput, HooklineError> {
        (**self).execute(argv, cwd)
    }
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput, HooklineError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HooklineError::Other("Cannot execute an empty command".into()))?;

        tracing::debug!(cwd = %cwd.display(), command = %argv.join(" "), "executing");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| HooklineError::Spawn {
                program: program.clone(),
                source,
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!(
                status = ?result.status,
                stderr = %result.stderr.trim(),
                "command exited unsuccessfully"
            );
        }

        Ok(result)
    }
}

/// Builds an owned argv from string slices.
pub(crate) fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout_and_status() {
        let tmp = TempDir::new().unwrap();
        let out = SystemRunner
            .execute(&argv(["sh", "-c", "echo hello; exit 3"]), tmp.path())
            .unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.status, Some(3));
        assert!(!out.success());
    }

    #[test]
    fn runs_in_the_given_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("marker.txt"), "x").unwrap();
        let out = SystemRunner.execute(&argv(["ls"]), tmp.path()).unwrap();
        assert!(out.success());
        assert!(out.stdout.contains("marker.txt"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let err = SystemRunner
            .execute(&argv(["definitely-not-a-real-binary-hookline"]), tmp.path())
            .unwrap_err();
        assert!(matches!(err, HooklineError::Spawn { .. }));
    }

    #[test]
    fn empty_argv_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(SystemRunner.execute(&[], tmp.path()).is_err());
    }
}
