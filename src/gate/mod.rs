//! Gating core
//!
//! The decision logic this crate exists for:
//! - `execution` - the should-execute scan over the run history
//! - `completion` - the should-complete two-phase waiter
//! - `decision` - the verdict type and its shell export rendering
//! - `clock` - time source abstraction so tests can drive the waiter
//!
//! Everything here works against the capability traits in
//! [`crate::github`]; no HTTP happens in this module tree.

use std::time::Duration;

use crate::github::ApiError;

pub mod clock;
pub mod completion;
pub mod decision;
pub mod execution;

pub use clock::Clock;
pub use completion::{CompletionWaiter, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DURATION};
pub use decision::GateDecision;
pub use execution::ExecutionGate;

/// Common error type for gate decisions and waits
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The history fetch returned no runs at all. An empty result set is
    /// never trustworthy enough to decide on.
    #[error("no previous runs were returned from the GitHub Actions API")]
    EmptyHistory,

    /// The opt-in deadline elapsed before the awaited run settled.
    #[error("gave up waiting for the previous run after {waited:?}")]
    DeadlineExceeded { waited: Duration },

    /// A fetch against the hosting API failed.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),
}
