//! Per-item results of a poll
//!
//! Every remote record or repository either produces a task or a skip with
//! its reason. Polling folds over these instead of swallowing errors.

use crate::integrations::RepoRef;
use crate::SyncError;
use standard_task::StandardTask;
use std::fmt;

/// Why a poll skipped something
#[derive(Debug)]
pub enum SkipReason {
    /// Configured repository is not `owner/repo`
    InvalidRepository(String),

    /// One record failed to map; the rest of the repository continues
    Record { repo: RepoRef, error: SyncError },

    /// Listing the repository failed; its remaining pages are skipped
    Repository { repo: RepoRef, error: SyncError },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidRepository(name) => {
                write!(f, "invalid repository name format: '{}'", name)
            }
            SkipReason::Record { repo, error } => write!(f, "{}: {}", repo, error),
            SkipReason::Repository { repo, error } => {
                write!(f, "error polling repository {}: {}", repo, error)
            }
        }
    }
}

/// Tagged result of one poll step
#[derive(Debug)]
pub enum PollOutcome {
    Task(Box<StandardTask>),
    Skipped(SkipReason),
}

impl PollOutcome {
    pub fn task(task: StandardTask) -> Self {
        PollOutcome::Task(Box::new(task))
    }

    pub fn into_task(self) -> Option<StandardTask> {
        match self {
            PollOutcome::Task(task) => Some(*task),
            PollOutcome::Skipped(_) => None,
        }
    }
}

/// Counters accumulated over a poll
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollStats {
    pub tasks: u32,
    pub skipped_records: u32,
    pub skipped_repositories: u32,
    pub errors: Vec<String>,
}

impl PollStats {
    pub fn record(&mut self, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Task(_) => self.tasks += 1,
            PollOutcome::Skipped(reason) => {
                match reason {
                    SkipReason::Record { .. } => self.skipped_records += 1,
                    SkipReason::InvalidRepository(_) | SkipReason::Repository { .. } => {
                        self.skipped_repositories += 1
                    }
                }
                self.errors.push(reason.to_string());
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
