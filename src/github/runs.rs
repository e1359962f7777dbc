//! Workflow run data model
//!
//! Types deserialized from the GitHub Actions REST payloads, plus the
//! small value types threaded through every API call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one status value with defined semantics. Everything else the API
/// reports (`"queued"`, `"in_progress"`, `"waiting"`, ...) is treated
/// uniformly as not yet finished.
pub const STATUS_COMPLETED: &str = "completed";

/// One historical execution of a workflow.
///
/// `run_number` is the ordering key: it increases monotonically within a
/// workflow and branch. `id` is only an opaque handle for later status
/// lookups; its numeric value carries no ordering guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: i64,
    pub run_number: i64,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    pub name: Option<String>,
    pub event: Option<String>,
    pub conclusion: Option<String>,
}

impl WorkflowRun {
    /// Whether the run has reached its final status.
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Wrapper shape of `GET .../workflows/{file}/runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRunsResponse {
    pub total_count: i64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Owner/repository pair identifying where a workflow lives.
#[derive(Debug, Clone, PartialEq, Eq)]
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
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parameters for one history fetch. The page is fixed at 1: the decision
/// only ever looks at the most recent window of runs.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub workflow_file: String,
    pub branch: String,
    pub per_page: usize,
}
