//! Error taxonomy for tool operations.
//!
//! The dispatcher maps these onto the failure variant of
//! [`crate::ToolResult`] with a total match -- no substring sniffing of error
//! text to tell the kinds apart.

use thiserror::Error;

/// Domain-specific failures a tool invocation can produce.
#[derive(Debug, Error)]
pub enum GitToolError {
    /// Request arguments were missing or malformed. Every violation is
    /// enumerated, not just the first; validation never touches the
    /// filesystem or spawns a process.
    #[error("Invalid arguments for {tool}: {}", .violations.join("; "))]
    Validation {
        /// Tool the request named.
        tool: String,
        /// One entry per violated field.
        violations: Vec<String>,
    },

    /// The request named an operation outside the fixed set.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required configuration is missing or a directory could not be
    /// created; carries the underlying OS failure text.
    #[error("{0}")]
    State(String),

    /// An external git command exited non-zero. First failure in a sequence
    /// aborts the remaining steps.
    #[error("{operation} failed at {step}: {message}")]
    Subprocess {
        /// Operation the caller invoked (e.g. `get_push`).
        operation: &'static str,
        /// The failing git step (e.g. `git commit`).
        step: &'static str,
        /// Failure text from the runner, including captured stderr.
        message: String,
    },
}
