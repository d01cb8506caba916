//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.

pub mod git_executor;

pub use git_executor::GitExecutor;
