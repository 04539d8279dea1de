// ABOUTME: Cooperative cancellation flag for pipeline runs.
// ABOUTME: Honored at stage boundaries until the first rollout dispatches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Marks a run for cancellation.
///
/// The orchestrator checks the flag between stages up to the rollout
/// fan-out. Once any target may be mid-replacement, cancellation is
/// ignored so every dispatched rollout runs to a terminal state.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!CancelFlag::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let observer = flag.clone();
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
