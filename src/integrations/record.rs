//! GitHub issue payloads
//!
//! [`RemoteIssue`] reads only the fields the connector needs and keeps the
//! whole JSON object alongside, so new fields on the API side never break
//! decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GitHub issue as returned by the REST API
///
/// Decoding never fails: fields of the wrong type read as absent and the
/// mapper decides whether the record is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct RemoteIssue {
    raw: Value,
}

impl From<Value> for RemoteIssue {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}

impl From<RemoteIssue> for Value {
    fn from(issue: RemoteIssue) -> Self {
        issue.raw
    }
}

impl RemoteIssue {
    fn field(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// True for `null`, non-objects and objects without keys
    pub fn is_empty(&self) -> bool {
        self.raw.as_object().map_or(true, |map| map.is_empty())
    }

    /// Issue number; `None` when missing, zero or not an integer
    pub fn number(&self) -> Option<u64> {
        self.field("number")
            .and_then(Value::as_u64)
            .filter(|n| *n > 0)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Body text; an explicit `null` body reads as `None`
    pub fn body(&self) -> Option<&str> {
        self.str_field("body")
    }

    pub fn state(&self) -> Option<&str> {
        self.str_field("state")
    }

    pub fn html_url(&self) -> Option<&str> {
        self.str_field("html_url")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.str_field("created_at")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.str_field("updated_at")
    }

    /// The issues endpoint also lists pull requests; they carry this key
    pub fn is_pull_request(&self) -> bool {
        self.field("pull_request").is_some()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Issue update request (PATCH body)
///
/// Only set fields are sent. `body: Some(None)` sends an explicit `null`,
/// which clears the issue description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateIssueRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl UpdateIssueRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.state.is_none()
    }
}
