//! Backing store lifecycle tracking.

use std::time::Instant;

use parking_lot::Mutex;

/// Point-in-time health of a backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// `initialize()` has not completed.
    Uninitialized,
    /// Open, and the most recent operation succeeded.
    Ready,
    /// Open, but the most recent operations failed.
    Degraded { last_error: String, failures: u32 },
}

#[derive(Debug, Default)]
struct Lifecycle {
    opened_at: Option<Instant>,
    last_error: Option<String>,
    consecutive_failures: u32,
}

/// Readiness and failure bookkeeping shared by a resolver's operations.
///
/// Failures recorded before initialization are kept so that a store that
/// never opened can still report why.
#[derive(Debug, Default)]
pub struct StoreState {
    lifecycle: Mutex<Lifecycle>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the store open and clears any earlier failure.
    pub fn mark_initialized(&self) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.opened_at = Some(Instant::now());
        lifecycle.last_error = None;
        lifecycle.consecutive_failures = 0;
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.lock().opened_at.is_some()
    }

    pub fn record_success(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.consecutive_failures > 0 {
            lifecycle.last_error = None;
            lifecycle.consecutive_failures = 0;
        }
    }

    pub fn record_failure(&self, error: impl Into<String>) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.last_error = Some(error.into());
        lifecycle.consecutive_failures = lifecycle.consecutive_failures.saturating_add(1);
    }

    pub fn last_error(&self) -> Option<String> {
        self.lifecycle.lock().last_error.clone()
    }

    pub fn health(&self) -> StoreHealth {
        let lifecycle = self.lifecycle.lock();
        match (&lifecycle.opened_at, &lifecycle.last_error) {
            (None, _) => StoreHealth::Uninitialized,
            (Some(_), None) => StoreHealth::Ready,
            (Some(_), Some(error)) => StoreHealth::Degraded {
                last_error: error.clone(),
                failures: lifecycle.consecutive_failures,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_uninitialized() {
        let state = StoreState::new();

        assert_eq!(state.health(), StoreHealth::Uninitialized);
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_open_failure_is_remembered() {
        let state = StoreState::new();
        state.record_failure("unable to open database file");

        assert_eq!(state.health(), StoreHealth::Uninitialized);
        assert_eq!(
            state.last_error().as_deref(),
            Some("unable to open database file")
        );

        state.mark_initialized();
        assert_eq!(state.health(), StoreHealth::Ready);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_degraded_until_next_success() {
        let state = StoreState::new();
        state.mark_initialized();

        state.record_failure("disk I/O error");
        state.record_failure("disk I/O error");
        assert_eq!(
            state.health(),
            StoreHealth::Degraded {
                last_error: "disk I/O error".to_string(),
                failures: 2,
            }
        );

        state.record_success();
        assert_eq!(state.health(), StoreHealth::Ready);
    }
}
