//! Git executor trait definition.
//!
//! This port is the seam between the operation handlers and the OS: one
//! external command, run to completion with both output streams captured.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::CommandOutcome;

/// Executes one external git command rooted at a working directory.
///
/// Arguments are passed as a discrete vector -- never concatenated into a
/// shell string -- so user-supplied commit messages, URLs, and branch names
/// cannot inject additional arguments.
///
/// Implementations never return an error: spawn failures and non-zero exits
/// are both folded into the returned [`CommandOutcome`], which keeps the
/// handlers' cumulative failure handling uniform.
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Run `git <args...>` in `cwd`, waiting for completion and capturing
    /// stdout and stderr in full.
    async fn run(&self, args: Vec<String>, cwd: &Path) -> CommandOutcome;
}
