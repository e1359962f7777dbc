//! # Actions Gate
//!
//! A CI-pipeline gatekeeper for GitHub Actions workflow runs: decides
//! whether the current invocation of a workflow should proceed, and
//! whether a dependent step must first wait for a previous run to fully
//! settle.
//!
//! ## Features
//!
//! - **Should-execute decision** - Classifies the current run against the
//!   recent run history with a single newest-first scan
//! - **Should-complete waiter** - Polls a predecessor run until completed,
//!   then waits out a settle window anchored to its last update
//! - **Shell-friendly output** - Renders decisions as `export` lines a
//!   pipeline step can `eval`
//! - **Pluggable time and transport** - Capability traits for the API and
//!   a virtual clock keep the core deterministic under test
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actions_gate::gate::{CompletionWaiter, ExecutionGate};
//! use actions_gate::github::{GithubClient, HistoryQuery, RepoRef, RunHistoryFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GithubClient::from_env()?;
//!     let repo = RepoRef::new("sarmad-abualkaz", "test-repo");
//!     let query = HistoryQuery {
//!         workflow_file: "cron_and_dispatch.yml".to_string(),
//!         branch: "main".to_string(),
//!         per_page: 20,
//!     };
//!
//!     let history = client.list_runs(&repo, &query).await?;
//!     let decision = ExecutionGate::evaluate(&history, 31, query.per_page)?;
//!
//!     if decision.should_wait_for_predecessor {
//!         if let Some(run_id) = decision.predecessor_run_id {
//!             CompletionWaiter::default()
//!                 .await_completion(&client, &repo, run_id)
//!                 .await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod gate;
pub mod github;

// Re-export main types
pub use config::{ConfigError, GateConfig};
pub use gate::{
    Clock, CompletionWaiter, ExecutionGate, GateDecision, GateError, DEFAULT_POLL_INTERVAL,
    DEFAULT_SETTLE_DURATION,
};
pub use github::{
    ApiError, GithubClient, HistoryQuery, ListRunsResponse, RepoRef, RunHistoryFetcher,
    RunStatusFetcher, WorkflowRun, STATUS_COMPLETED,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::GateConfig;
    pub use crate::gate::{CompletionWaiter, ExecutionGate, GateDecision, GateError};
    pub use crate::github::{
        ApiError, GithubClient, RepoRef, RunHistoryFetcher, RunStatusFetcher, WorkflowRun,
    };
}
