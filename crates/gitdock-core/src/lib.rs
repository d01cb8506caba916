//! Core domain types and port definitions for gitdock.
//!
//! This crate contains the protocol- and process-agnostic heart of the
//! server: the workspace configuration state, the command outcome and tool
//! result types, the error taxonomy, the audit log writer, and the port
//! (trait) the git adapter implements.

pub mod audit;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use audit::{AuditLevel, log_event};
pub use domain::{CommandOutcome, LOG_FILE_NAME, ToolResult, WorkspaceConfig, absolutize};
pub use error::GitToolError;
pub use ports::GitExecutor;
