//! Connector configuration file handling
//!
//! Loads ~/.config/issuesync/config.yaml: credentials, API endpoint and the
//! ordered list of repositories to poll.

use crate::integrations::GITHUB_API_BASE_URL;
use crate::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when the file has no token
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

fn default_base_url() -> String {
    GITHUB_API_BASE_URL.to_string()
}

fn default_page_pause_ms() -> u64 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// GitHub connector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Personal access token; falls back to $GITHUB_TOKEN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// REST API root (GitHub Enterprise: https://host/api/v3)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Repositories to poll, as "owner/repo", in polling order
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Pause between page fetches in milliseconds
    #[serde(default = "default_page_pause_ms")]
    pub page_pause_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ConnectorConfig {
    pub fn new() -> Self {
        Self {
            github_token: None,
            base_url: default_base_url(),
            repositories: Vec::new(),
            page_pause_ms: default_page_pause_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_repository(mut self, full_name: impl Into<String>) -> Self {
        self.repositories.push(full_name.into());
        self
    }

    pub fn with_page_pause(mut self, pause: Duration) -> Self {
        self.page_pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Load configuration from the default path (~/.config/issuesync/config.yaml)
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SyncError::ConfigNotFound(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "Loading issuesync configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            repositories = config.repositories.len(),
            base_url = %config.base_url,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving issuesync configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/issuesync/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("issuesync");
        path.push("config.yaml");
        path
    }

    /// Token from the file, else from $GITHUB_TOKEN
    pub fn resolve_token(&self) -> Result<String> {
        self.token_or(std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Token from the file, else `fallback`; empty values count as missing
    pub fn token_or(&self, fallback: Option<String>) -> Result<String> {
        self.github_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| fallback.filter(|t| !t.trim().is_empty()))
            .ok_or_else(|| {
                SyncError::Config(format!(
                    "GitHub token ('github_token') not found in config or ${}",
                    TOKEN_ENV_VAR
                ))
            })
    }

    pub fn page_pause(&self) -> Duration {
        Duration::from_millis(self.page_pause_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::new()
    }
}
