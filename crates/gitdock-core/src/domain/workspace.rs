//! Workspace configuration state.
//!
//! A single `WorkspaceConfig` instance holds the working directory all git
//! commands execute against, plus the derived audit log path. Mutation is
//! funneled through one setter so the `log_file == working_dir/LOG_FILE_NAME`
//! invariant cannot drift.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::GitToolError;

/// Fixed file name of the per-workspace audit log.
pub const LOG_FILE_NAME: &str = "gitdock.log";

/// Resolve `path` to an absolute, lexically normalized form.
///
/// Relative paths are resolved against `base` (the directory the process was
/// started from). `.` components are dropped and `..` components pop their
/// parent; no symlinks are followed and the result does not need to exist.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Server-wide configuration: the working directory and its audit log path.
///
/// Handlers receive this behind a shared handle and lock it for the full
/// duration of one operation, so a concurrent `load_config` can never swap
/// the directory out from under a running git sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    working_dir: PathBuf,
    log_file: PathBuf,
}

impl WorkspaceConfig {
    /// Create a configuration rooted at `working_dir` (assumed absolute).
    pub fn new(working_dir: PathBuf) -> Self {
        let log_file = working_dir.join(LOG_FILE_NAME);
        Self {
            working_dir,
            log_file,
        }
    }

    /// The directory all git commands execute against.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The derived audit log path, always `working_dir/LOG_FILE_NAME`.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Replace the working directory, creating it (and any missing parents)
    /// on demand, and recompute the log path in the same step.
    ///
    /// Relative paths resolve against `base`. On failure the previous
    /// configuration is left untouched.
    pub fn set_working_dir(&mut self, path: &Path, base: &Path) -> Result<(), GitToolError> {
        let resolved = absolutize(path, base);

        fs::create_dir_all(&resolved).map_err(|e| {
            GitToolError::State(format!(
                "failed to create working directory {}: {e}",
                resolved.display()
            ))
        })?;

        self.log_file = resolved.join(LOG_FILE_NAME);
        self.working_dir = resolved;
        Ok(())
    }
}
