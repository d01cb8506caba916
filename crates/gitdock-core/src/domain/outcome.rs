//! Result of a single external command execution.

use serde::{Deserialize, Serialize};

/// Captured result of one git subprocess invocation.
///
/// Produced by the process runner and consumed within one operation handler;
/// never persisted. A non-zero exit (or a spawn failure) is reported through
/// `exited_cleanly = false` plus a human-readable `failure_message` -- the
/// runner is the single translation point from OS errors into this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether the process exited with status zero.
    pub exited_cleanly: bool,
    /// Full captured stdout.
    pub stdout: String,
    /// Full captured stderr.
    pub stderr: String,
    /// Failure description built from stderr and the exit status, if any.
    pub failure_message: Option<String>,
}

impl CommandOutcome {
    /// Outcome of a clean (status zero) exit.
    pub const fn success(stdout: String, stderr: String) -> Self {
        Self {
            exited_cleanly: true,
            stdout,
            stderr,
            failure_message: None,
        }
    }

    /// Outcome of a non-zero exit or spawn failure.
    pub const fn failure(stdout: String, stderr: String, message: String) -> Self {
        Self {
            exited_cleanly: false,
            stdout,
            stderr,
            failure_message: Some(message),
        }
    }

    /// Both output streams joined, for substring checks such as the
    /// "nothing to commit" no-op detection.
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}
