//! MCP protocol adapter for gitdock.
//!
//! Implements the MCP protocol over stdio (JSON-RPC 2.0).
//! Reference: <https://spec.modelcontextprotocol.io/>
//!
//! Only encoded protocol messages are ever written to stdout; all
//! diagnostics go through `tracing`, which the binary routes to stderr.

pub mod dispatch;
pub mod protocol;
pub mod registry;
pub mod server;

// Re-export domain types from core for convenience
pub use gitdock_core::{GitToolError, ToolResult};

// Re-export this crate's public types
pub use dispatch::Dispatcher;
pub use server::McpServer;
