//! Gate decision output
//!
//! The verdict for one invocation, plus its rendering as shell export
//! lines. String-typed booleans and the `0` no-predecessor sentinel are
//! artifacts of that boundary and exist only here; everything internal
//! uses real `bool`s and `Option`.

/// Verdict produced for one current run against its history.
///
/// The default value is the safe "do nothing" decision: not executing,
/// not waiting, no predecessor identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateDecision {
    /// Whether the current invocation should proceed at all.
    pub should_execute: bool,
    /// Whether it must first wait for the predecessor run to finish.
    pub should_wait_for_predecessor: bool,
    /// Id of the predecessor run to react to, when one was identified.
    pub predecessor_run_id: Option<i64>,
}

impl GateDecision {
    /// Proceed immediately; the nearest older run already finished.
    pub fn execute(predecessor_run_id: i64) -> Self {
        Self {
            should_execute: true,
            should_wait_for_predecessor: false,
            predecessor_run_id: Some(predecessor_run_id),
        }
    }

    /// Proceed, but only once the still-active predecessor settles.
    pub fn execute_after(predecessor_run_id: i64) -> Self {
        Self {
            should_execute: true,
            should_wait_for_predecessor: true,
            predecessor_run_id: Some(predecessor_run_id),
        }
    }

    /// Render the decision as `export NAME=value` lines for a shell step
    /// to `eval`. Booleans become the strings `true`/`false`; a missing
    /// predecessor becomes the literal `0`. Consumers distinguish "no
    /// predecessor" from "predecessor 0" by convention only, so the
    /// sentinel must stay exactly `0`.
    pub fn export_lines(&self) -> [String; 3] {
        [
            format!("export SHOULD_RUN_EXECUTE={}", self.should_execute),
            format!(
                "export SHOULD_WAIT_FOR_PAST_RUN={}",
                self.should_wait_for_predecessor
            ),
            format!(
                "export PAST_RUN_ID={}",
                self.predecessor_run_id.unwrap_or(0)
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_do_nothing() {
        let decision = GateDecision::default();
        assert!(!decision.should_execute);
        assert!(!decision.should_wait_for_predecessor);
        assert_eq!(decision.predecessor_run_id, None);
    }

    #[test]
    fn test_constructors() {
        let decision = GateDecision::execute(3333333333);
        assert!(decision.should_execute);
        assert!(!decision.should_wait_for_predecessor);
        assert_eq!(decision.predecessor_run_id, Some(3333333333));

        let decision = GateDecision::execute_after(3333333333);
        assert!(decision.should_execute);
        assert!(decision.should_wait_for_predecessor);
        assert_eq!(decision.predecessor_run_id, Some(3333333333));
    }

    #[test]
    fn test_export_lines() {
        let lines = GateDecision::execute_after(3333333333).export_lines();
        assert_eq!(lines[0], "export SHOULD_RUN_EXECUTE=true");
        assert_eq!(lines[1], "export SHOULD_WAIT_FOR_PAST_RUN=true");
        assert_eq!(lines[2], "export PAST_RUN_ID=3333333333");
    }

    #[test]
    fn test_export_lines_use_zero_sentinel() {
        let lines = GateDecision::default().export_lines();
        assert_eq!(lines[0], "export SHOULD_RUN_EXECUTE=false");
        assert_eq!(lines[1], "export SHOULD_WAIT_FOR_PAST_RUN=false");
        assert_eq!(lines[2], "export PAST_RUN_ID=0");
    }
}
