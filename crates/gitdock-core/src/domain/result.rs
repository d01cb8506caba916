//! The uniform two-variant tool result.

use serde::{Deserialize, Serialize};

/// Outcome of one tool invocation as seen by the caller.
///
/// Every handler return value and every error shape converges into this type
/// at the dispatcher; it never carries both a success text and a failure
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToolResult {
    /// The operation completed; `text` is the human-readable summary.
    Success { text: String },
    /// The operation failed; `message` names the operation, the failing
    /// step, and any captured diagnostics.
    Failure { message: String },
}

impl ToolResult {
    /// Create a success result.
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    /// Create a failure result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Whether this is the failure variant.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The carried text, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { message } => message,
        }
    }
}
