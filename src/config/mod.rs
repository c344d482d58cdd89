//! Configuration system
//!
//! Loads ~/.config/issuesync/config.yaml with:
//! - GitHub credentials (or $GITHUB_TOKEN)
//! - API endpoint, for GitHub Enterprise
//! - The repositories to poll and paging/timeout settings

mod connector_config;
pub mod validation;

pub use connector_config::{ConnectorConfig, TOKEN_ENV_VAR};
pub use validation::{validate_config, ValidationError, ValidationResult};
