//! Should-execute decision
//!
//! Classifies the current workflow invocation against the fetched run
//! history with a single newest-first scan that stops at the first
//! decisive entry.

use tracing::{info, warn};

use crate::github::WorkflowRun;

use super::decision::GateDecision;
use super::GateError;

pub struct ExecutionGate;

impl ExecutionGate {
    /// Decide whether the current invocation should proceed, and whether
    /// it must wait for a predecessor first.
    ///
    /// `history` must be ordered newest run number first, exactly as the
    /// hosting API returns it. The scan never re-sorts; order carries the
    /// nearest-neighbor semantics:
    ///
    /// - a newer, already completed run makes the current one obsolete;
    /// - otherwise the first older run encountered is the nearest
    ///   predecessor, and its status alone determines whether to wait.
    ///
    /// Runs with the same run number as the current one are skipped.
    /// An empty history is an error; a history shorter than
    /// `expected_history_size` only degrades confidence and is logged.
    pub fn evaluate(
        history: &[WorkflowRun],
        current_run_number: i64,
        expected_history_size: usize,
    ) -> Result<GateDecision, GateError> {
        let mut decision = GateDecision::default();

        for run in history {
            if run.run_number > current_run_number && run.is_completed() {
                warn!(
                    current_run_number,
                    newer_run_number = run.run_number,
                    "no need to run this invocation; a newer run has already completed"
                );
                break;
            } else if run.run_number < current_run_number && run.is_completed() {
                decision = GateDecision::execute(run.id);
                break;
            } else if run.run_number < current_run_number && !run.is_completed() {
                decision = GateDecision::execute_after(run.id);
                break;
            }
            // equal run number, or newer but still active: not decisive
        }

        if history.is_empty() {
            return Err(GateError::EmptyHistory);
        }

        if history.len() < expected_history_size {
            warn!(
                current_run_number,
                returned = history.len(),
                expected = expected_history_size,
                "run history is shorter than the requested window"
            );
        }

        info!(
            current_run_number,
            should_execute = decision.should_execute,
            should_wait_for_predecessor = decision.should_wait_for_predecessor,
            predecessor_run_id = decision.predecessor_run_id.unwrap_or(0),
            "execution gate decided"
        );

        Ok(decision)
    }
}
