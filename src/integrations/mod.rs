//! GitHub Issues integration
//!
//! # Layers
//!
//! - **transport**: request/response capability (`reqwest` in production)
//! - **github**: REST client with paged, incremental listing
//! - **mapping**: pure conversion between issues and standard tasks
//!
//! # Sync Flow
//!
//! 1. **Ingress** (GitHub → tasks): list issues updated since the cursor,
//!    oldest first, and map each to a standard task
//! 2. **Egress** (tasks → GitHub): turn a change set into a PATCH payload

pub mod github;
pub mod ids;
pub mod mapping;
pub mod record;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use github::{GitHubClient, DEFAULT_PAGE_PAUSE, PAGE_SIZE};
pub use ids::{IssueRef, RepoRef};
pub use mapping::{to_remote_payload, to_standard_task, SOURCE_NAME};
pub use record::{RemoteIssue, UpdateIssueRequest};
pub use transport::{
    ApiRequest, ApiResponse, Method, ReqwestTransport, Transport, GITHUB_API_BASE_URL,
};
