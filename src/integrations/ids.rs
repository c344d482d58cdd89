//! Type-safe identifiers for repositories and issues

use crate::SyncError;
use std::fmt;
use std::str::FromStr;

/// A repository to poll, written as `owner/repo`
///
/// Only the first `/` separates owner from repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse `owner/repo`, returning `None` when either side is missing
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, repo) = full_name.split_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(owner, repo))
    }

    /// Reference to an issue inside this repository
    pub fn issue(&self, number: u64) -> IssueRef {
        IssueRef {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number,
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Identifier of a single issue: `owner/repo/number`
///
/// This is the `source_id` of every task the connector produces, so
/// formatting and parsing must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse `owner/repo/number`
    ///
    /// Exactly three non-empty segments; the number is a positive decimal
    /// without sign or leading zeros.
    pub fn parse(id: &str) -> crate::Result<Self> {
        let invalid = || SyncError::InvalidId(id.to_string());

        let mut segments = id.split('/');
        let (Some(owner), Some(repo), Some(number), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid());
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(invalid());
        }
        if number.is_empty()
            || number.starts_with('0')
            || !number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let number: u64 = number.parse().map_err(|_| invalid())?;

        Ok(Self::new(owner, repo, number))
    }

    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.clone(), self.repo.clone())
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner, self.repo, self.number)
    }
}

impl FromStr for IssueRef {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_ref_round_trip() {
        for id in ["owner/repo/1", "rust-lang/rust/123456", "a/b/42"] {
            let parsed = IssueRef::parse(id).expect("valid id");
            assert_eq!(parsed.to_string(), id);
        }
    }

    #[test]
    fn test_issue_ref_parts() {
        let id: IssueRef = "octo/hello-world/42".parse().unwrap();
        assert_eq!(id.owner, "octo");
        assert_eq!(id.repo, "hello-world");
        assert_eq!(id.number, 42);
        assert_eq!(id.repo_ref(), RepoRef::new("octo", "hello-world"));
    }

    #[test]
    fn test_issue_ref_rejects_malformed() {
        let cases = [
            "owner/repo",
            "owner",
            "",
            "owner/repo/",
            "/repo/1",
            "owner//1",
            "owner/repo/abc",
            "owner/repo/0",
            "owner/repo/-3",
            "owner/repo/+3",
            "owner/repo/007",
            "owner/repo/1/extra",
            "/owner/repo/1",
            "owner/repo/1/",
            "owner/repo/99999999999999999999999",
        ];
        for id in cases {
            match IssueRef::parse(id) {
                Err(SyncError::InvalidId(raw)) => assert_eq!(raw, id),
                other => panic!("expected InvalidId for {:?}, got {:?}", id, other),
            }
        }
    }

    #[test]
    fn test_repo_ref_parse() {
        assert_eq!(RepoRef::parse("octo/repo"), Some(RepoRef::new("octo", "repo")));
        // Split happens once; the remainder belongs to the repo name
        assert_eq!(RepoRef::parse("octo/a/b"), Some(RepoRef::new("octo", "a/b")));
        assert_eq!(RepoRef::parse("no-separator"), None);
        assert_eq!(RepoRef::parse("/repo"), None);
        assert_eq!(RepoRef::parse("owner/"), None);
    }

    #[test]
    fn test_repo_issue_formats_as_source_id() {
        let repo = RepoRef::new("octo", "repo");
        assert_eq!(repo.issue(9).to_string(), "octo/repo/9");
        assert_eq!(repo.to_string(), "octo/repo");
    }
}
