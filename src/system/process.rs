//! External command runner.
//!
//! Every external tool (systemctl, podman, apt-get, useradd, id) goes through
//! this module. Arguments are always passed as discrete tokens; nothing is
//! ever handed to a shell.

use crate::error::{PodsvcError, Result};
use std::env;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::debug;

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            code: output.status.code(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stderr if non-empty, otherwise stdout.
    pub fn message(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Run a command and return its output whatever the exit status.
///
/// Fails only when the program cannot be spawned.
pub fn run_command_unchecked(program: &str, args: &[&str]) -> Result<CommandOutput> {
    run(program, args, &[])
}

/// Run a command and fail with [`PodsvcError::CommandFailed`] on a non-zero exit.
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandOutput> {
    check(program, args, run(program, args, &[])?)
}

/// Like [`run_command`] with extra environment variables.
pub fn run_command_env(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Result<CommandOutput> {
    check(program, args, run(program, args, envs)?)
}

fn run(program: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<CommandOutput> {
    debug!(program, ?args, "running command");

    let output = Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .output()
        .map_err(|e| {
            PodsvcError::CommandFailed(format!("failed to execute {}: {}", program, e))
        })?;

    let output = CommandOutput::from_output(&output);
    debug!(program, code = ?output.code, "command finished");
    Ok(output)
}

fn check(program: &str, args: &[&str], output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        return Ok(output);
    }
    let code = output
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    Err(PodsvcError::CommandFailed(format!(
        "{} {} failed (exit code {}): {}",
        program,
        shell_words::join(args),
        code,
        output.message()
    )))
}

/// Locate `program` on `PATH`.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_captures_stdout() {
        let output = run_command("echo", &["hello", "world"]).unwrap();
        assert_eq!(output.stdout, "hello world");
        assert!(output.success());
    }

    #[test]
    fn test_run_command_passes_arguments_verbatim() {
        let output = run_command("echo", &["a; rm -rf /", "$HOME"]).unwrap();
        assert_eq!(output.stdout, "a; rm -rf / $HOME");
    }

    #[test]
    fn test_run_command_fails_on_nonzero_exit() {
        let err = run_command("false", &[]).unwrap_err();
        assert!(matches!(err, PodsvcError::CommandFailed(_)));
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_run_command_unchecked_reports_status() {
        let output = run_command_unchecked("false", &[]).unwrap();
        assert!(!output.success());
        assert_eq!(output.code, Some(1));
    }

    #[test]
    fn test_run_command_env() {
        let output = run_command_env("sh", &["-c", "echo $PODSVC_TEST"], &[("PODSVC_TEST", "x")])
            .unwrap();
        assert_eq!(output.stdout, "x");
    }

    #[test]
    fn test_missing_program_is_command_failed() {
        let err = run_command("podsvc-definitely-not-installed", &[]).unwrap_err();
        assert!(matches!(err, PodsvcError::CommandFailed(_)));
    }

    #[test]
    fn test_find_on_path() {
        assert!(find_on_path("sh").is_some());
        assert!(find_on_path("podsvc-definitely-not-installed").is_none());
    }
}
