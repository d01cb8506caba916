//! Subprocess execution of git commands.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use gitdock_core::{CommandOutcome, GitExecutor};

/// Runs git commands as child processes.
///
/// Each invocation passes its arguments as a discrete vector and waits for
/// the child to exit, capturing both output streams in full. There is no
/// timeout: a hung git process hangs the in-flight request (a documented
/// non-goal to change).
pub struct GitCommandRunner {
    program: PathBuf,
}

impl GitCommandRunner {
    /// Runner for the `git` binary found on `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Runner for an alternative program. Used by tests to exercise the
    /// capture and failure paths without a git repository.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitExecutor for GitCommandRunner {
    async fn run(&self, args: Vec<String>, cwd: &Path) -> CommandOutcome {
        let subcommand = args.first().cloned().unwrap_or_default();

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

                if output.status.success() {
                    debug!(command = %subcommand, cwd = %cwd.display(), "git command completed");
                    CommandOutcome::success(stdout, stderr)
                } else {
                    let message = format!(
                        "git {subcommand} {}: {}",
                        describe_status(output.status),
                        stderr.trim()
                    );
                    debug!(command = %subcommand, cwd = %cwd.display(), %message, "git command failed");
                    CommandOutcome::failure(stdout, stderr, message)
                }
            }
            Err(e) => CommandOutcome::failure(
                String::new(),
                String::new(),
                format!("failed to spawn {}: {e}", self.program.display()),
            ),
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    status.code().map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exited with status {code}"),
    )
}
