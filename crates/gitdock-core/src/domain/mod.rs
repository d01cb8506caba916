//! Domain types shared across the adapters.

pub mod outcome;
pub mod result;
pub mod workspace;

pub use outcome::CommandOutcome;
pub use result::ToolResult;
pub use workspace::{LOG_FILE_NAME, WorkspaceConfig, absolutize};
