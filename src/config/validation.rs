//! Configuration validation
//!
//! Checks a connector configuration before any request is made:
//! - A token is available
//! - The API base URL is http(s)
//! - Repository entries look like `owner/repo`
//! - No repository is listed twice

use super::connector_config::ConnectorConfig;
use crate::integrations::RepoRef;
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a connector configuration
///
/// `env_token` is the value of $GITHUB_TOKEN, if any.
pub fn validate_config(config: &ConnectorConfig, env_token: Option<String>) -> ValidationResult {
    let mut errors = Vec::new();

    if config.token_or(env_token).is_err() {
        errors.push(ValidationError::new(
            "github_token",
            "No token in config and GITHUB_TOKEN is not set",
        ));
    }

    if !(config.base_url.starts_with("https://") || config.base_url.starts_with("http://")) {
        errors.push(ValidationError::new(
            "base_url",
            format!("Must be an http(s) URL, got '{}'", config.base_url),
        ));
    }

    if config.repositories.is_empty() {
        errors.push(ValidationError::new(
            "repositories",
            "At least one repository must be listed",
        ));
    }

    let mut seen = HashSet::new();
    for repo in &config.repositories {
        if RepoRef::parse(repo).is_none() {
            errors.push(ValidationError::new(
                "repositories",
                format!("Invalid repository name '{}', expected 'owner/repo'", repo),
            ));
        } else if !seen.insert(repo.as_str()) {
            errors.push(ValidationError::new(
                "repositories",
                format!("Duplicate repository: {}", repo),
            ));
        }
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "request_timeout_secs",
            "Must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
