//! Should-complete waiter
//!
//! Blocks until a specific workflow run is safe to treat as finished:
//! first polls its status until the hosting service reports
//! `"completed"`, then waits out a settle window anchored to the run's
//! own last-update timestamp. The settle anchor makes slow and fast
//! pollers converge on the same real-world point instead of each adding
//! a full grace period after whenever they happened to observe
//! completion.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::github::runs::RepoRef;
use crate::github::{RunStatusFetcher, WorkflowRun};

use super::clock::Clock;
use super::GateError;

/// How long to wait between status checks on the predecessor run.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Grace period that must elapse after the predecessor's last update
/// before a dependent step may proceed.
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_secs(60);

/// Two-phase wait state machine for a single workflow run.
///
/// The wait is unbounded by default; [`with_deadline`] opts in to a
/// cap on the total time spent waiting.
///
/// [`with_deadline`]: CompletionWaiter::with_deadline
#[derive(Debug, Clone)]
pub struct CompletionWaiter {
    poll_interval: Duration,
    settle_duration: Duration,
    deadline: Option<Duration>,
    clock: Clock,
}

impl Default for CompletionWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DURATION)
    }
}

impl CompletionWaiter {
    pub fn new(poll_interval: Duration, settle_duration: Duration) -> Self {
        Self {
            poll_interval,
            settle_duration,
            deadline: None,
            clock: Clock::system(),
        }
    }

    /// Cap the total wait. The deadline is evaluated between waits, never
    /// mid-sleep, so an in-flight sleep always runs to its end before the
    /// waiter gives up.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replace the clock, letting tests drive time virtually.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Block until `run_id` has completed and settled, returning the final
    /// run record.
    ///
    /// Phase 1 polls the run's status every `poll_interval`; a fetch error
    /// propagates immediately, there is no retry budget here. Phase 2
    /// performs a single corrective sleep to the settle point and never
    /// fetches again; the status is already known to be final. Calling
    /// this on an already-settled run returns without sleeping at all.
    #[instrument(skip(self, fetcher), fields(owner = %repo.owner, repo = %repo.repo, run_id))]
    pub async fn await_completion(
        &self,
        fetcher: &dyn RunStatusFetcher,
        repo: &RepoRef,
        run_id: i64,
    ) -> Result<WorkflowRun, GateError> {
        let started = self.clock.now().await;

        let run = loop {
            let run = fetcher.get_run(repo, run_id).await?;
            if run.is_completed() {
                break run;
            }
            info!(status = %run.status, "waiting on previous run to complete");
            self.pause(started, self.poll_interval).await?;
        };

        loop {
            let now = self.clock.now().await;
            let elapsed = elapsed_since(now, run.updated_at);
            if elapsed >= self.settle_duration {
                break;
            }
            let remaining = self.settle_duration - elapsed;
            info!(
                remaining_secs = remaining.as_secs(),
                "previous run completed; waiting out the settle window"
            );
            self.pause(started, remaining).await?;
        }

        info!(status = %run.status, "previous run has settled");
        Ok(run)
    }

    async fn pause(&self, started: DateTime<Utc>, duration: Duration) -> Result<(), GateError> {
        if let Some(deadline) = self.deadline {
            let waited = elapsed_since(self.clock.now().await, started);
            if waited >= deadline {
                return Err(GateError::DeadlineExceeded { waited });
            }
        }
        self.clock.sleep(duration).await;
        Ok(())
    }
}

/// Wall-clock distance from `since` to `now`, clamped to zero when the
/// hosting service reports an update timestamp ahead of our clock.
fn elapsed_since(now: DateTime<Utc>, since: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}
