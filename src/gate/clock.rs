//! Clock backing the completion waiter
//!
//! Real time by default. Tests switch a clock into virtual mode: `now()`
//! then returns the frozen instant and `sleep()` advances it instead of
//! suspending, so wait sequences run deterministically and instantly
//! while exercising the exact arithmetic the real path uses.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct Clock {
    virtual_time: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl Clock {
    /// Clock that reads and sleeps on real time.
    pub fn system() -> Self {
        Self::default()
    }

    /// Clock frozen at `start`; only `sleep` moves it forward.
    pub fn virtual_at(start: DateTime<Utc>) -> Self {
        Self {
            virtual_time: Arc::new(RwLock::new(Some(start))),
        }
    }

    pub async fn is_virtual(&self) -> bool {
        self.virtual_time.read().await.is_some()
    }

    /// Current time, virtual or real.
    pub async fn now(&self) -> DateTime<Utc> {
        (*self.virtual_time.read().await).unwrap_or_else(Utc::now)
    }

    /// Suspend for `duration` on a real clock; advance the virtual
    /// instant by `duration` otherwise.
    pub async fn sleep(&self, duration: Duration) {
        let mut state = self.virtual_time.write().await;
        match *state {
            Some(current) => {
                *state = Some(current + duration);
            }
            None => {
                drop(state);
                tokio::time::sleep(duration).await;
            }
        }
    }

    /// Move a virtual clock forward without sleeping. No-op on a real
    /// clock.
    pub async fn advance(&self, duration: Duration) {
        let mut state = self.virtual_time.write().await;
        if let Some(current) = *state {
            *state = Some(current + duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_system_clock_tracks_real_time() {
        tokio_test::block_on(async {
            let clock = Clock::system();
            assert!(!clock.is_virtual().await);

            let delta = (clock.now().await - Utc::now()).num_seconds().abs();
            assert!(delta < 5);
        });
    }

    #[tokio::test]
    async fn test_virtual_clock_is_frozen() {
        let start = instant("2024-01-15T10:00:00Z");
        let clock = Clock::virtual_at(start);

        assert!(clock.is_virtual().await);
        assert_eq!(clock.now().await, start);
        assert_eq!(clock.now().await, start);
    }

    #[tokio::test]
    async fn test_virtual_sleep_advances_without_suspending() {
        let start = instant("2024-01-15T10:00:00Z");
        let clock = Clock::virtual_at(start);

        clock.sleep(Duration::from_secs(3600)).await;

        assert_eq!(clock.now().await, instant("2024-01-15T11:00:00Z"));
    }

    #[tokio::test]
    async fn test_advance() {
        let start = instant("2024-01-15T10:00:00Z");
        let clock = Clock::virtual_at(start);

        clock.advance(Duration::from_secs(90)).await;

        assert_eq!(clock.now().await, instant("2024-01-15T10:01:30Z"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let start = instant("2024-01-15T10:00:00Z");
        let clock = Clock::virtual_at(start);
        let other = clock.clone();

        clock.sleep(Duration::from_secs(60)).await;

        assert_eq!(other.now().await, instant("2024-01-15T10:01:00Z"));
    }
}
