//! GitHub Actions API collaborators
//!
//! This module contains everything that talks to the hosting service:
//! - `runs` - Workflow run payload types and identifiers
//! - `client` - The reqwest-backed GitHub REST client
//!
//! The gate core never uses the client directly; it consumes the two
//! capability traits defined here, so tests (and other backends) can
//! substitute their own implementations.

use async_trait::async_trait;

pub mod client;
pub mod runs;

pub use client::GithubClient;
pub use runs::{HistoryQuery, ListRunsResponse, RepoRef, WorkflowRun, STATUS_COMPLETED};

/// Common error type for GitHub API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The workflow (or run) does not exist as far as the API is concerned.
    #[error("workflow not found")]
    WorkflowNotFound,

    /// HTTP 410: the API method is gone.
    #[error("API method gone")]
    MethodGone,

    /// Any other non-2xx response.
    #[error("status not OK: {status}")]
    StatusNotOk { status: u16 },

    /// Network, TLS, or deserialization failure from the transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The client itself could not be constructed.
    #[error("client configuration error: {0}")]
    InvalidConfig(String),
}

/// Capability to fetch the recent run history of one workflow, newest
/// run number first, exactly as the API delivers it.
#[async_trait]
pub trait RunHistoryFetcher: Send + Sync {
    async fn list_runs(
        &self,
        repo: &RepoRef,
        query: &HistoryQuery,
    ) -> Result<Vec<WorkflowRun>, ApiError>;
}

/// Capability to fetch the current state of a single run by id.
#[async_trait]
pub trait RunStatusFetcher: Send + Sync {
    async fn get_run(&self, repo: &RepoRef, run_id: i64) -> Result<WorkflowRun, ApiError>;
}
