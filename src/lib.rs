//! issuesync - GitHub Issues to standard task synchronization
//!
//! Pulls issues from GitHub repositories into the connector-agnostic
//! [`standard_task::StandardTask`] model and pushes local edits back.
//!
//! # Architecture
//!
//! - **integrations**: GitHub REST transport, client and record mapping
//! - **sync**: connector facade with cursor-based incremental polling
//! - **config**: credentials, endpoint and repository list
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod sync;

// Re-exports
pub use error::{Result, SyncError};
pub use standard_task::{ChangeSet, StandardTask, TaskStatus};
