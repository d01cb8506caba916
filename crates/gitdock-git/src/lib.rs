//! Git adapter for gitdock.
//!
//! Implements the [`gitdock_core::GitExecutor`] port by spawning the real
//! `git` binary, and composes runner calls into the four git-backed tool
//! operations.

pub mod runner;
pub mod service;

// Re-export domain types from core for convenience
pub use gitdock_core::{CommandOutcome, GitExecutor, GitToolError, WorkspaceConfig};

// Re-export this crate's public types
pub use runner::GitCommandRunner;
pub use service::GitService;
