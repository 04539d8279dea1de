// ABOUTME: State transition methods for rollout coordination.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::marker::PhantomData;
use std::time::Instant;

use crate::compute::ComputeOps;
use crate::config::HealthConfig;

use super::Rollout;
use super::error::RolloutError;
use super::state::{Committed, Pending, RolledBack, Updating};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Rollout<T>, (Rollout<S>, RolloutError)>;

/// Outcome of dispatching a pending rollout.
///
/// A target already running the desired digest commits immediately without
/// a replace instruction; otherwise the replace is in flight and the
/// health gate is next.
#[derive(Debug)]
pub enum Dispatched {
    AlreadyCurrent(Rollout<Committed>),
    Updating(Rollout<Updating>),
}

impl<S> Rollout<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self) -> Rollout<T> {
        Rollout {
            target: self.target,
            desired: self.desired,
            previous: self.previous,
            skipped: self.skipped,
            _state: PhantomData,
        }
    }
}

// =============================================================================
// Pending -> Updating | Committed
// =============================================================================

impl Rollout<Pending> {
    /// Issue the replace instruction, unless the target is already at the
    /// desired digest.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::UpdateFailed` if the compute layer rejects
    /// the replace. Nothing was changed, so no rollback is owed.
    #[must_use = "rollout state must be used"]
    pub async fn dispatch<C: ComputeOps>(self, compute: &C) -> Result<Dispatched, RolloutError> {
        if self.previous.as_ref() == Some(&self.desired) {
            tracing::info!(target = %self.target.name, digest = %self.desired.short(), "target already current, skipping replace");
            let mut committed: Rollout<Committed> = self.transition();
            committed.skipped = true;
            return Ok(Dispatched::AlreadyCurrent(committed));
        }

        tracing::info!(target = %self.target.name, digest = %self.desired.short(), "issuing replace");

        compute
            .replace(&self.target.name, &self.desired)
            .await
            .map_err(RolloutError::UpdateFailed)?;

        Ok(Dispatched::Updating(self.transition()))
    }
}

// =============================================================================
// Updating -> Committed
// =============================================================================

impl Rollout<Updating> {
    /// Poll the target's health until it passes or the bounds are spent.
    ///
    /// Polling backs off exponentially from `initial_interval`, doubling
    /// and capping at `max_interval`; the loop stops on the first healthy
    /// observation, after `max_attempts` failed polls, or when the
    /// `timeout` budget elapses.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure to allow rollback.
    #[must_use = "rollout state must be used"]
    pub async fn health_check<C: ComputeOps>(
        self,
        compute: &C,
        health: &HealthConfig,
    ) -> TransitionResult<Committed, Updating> {
        let start = Instant::now();
        let mut interval = health.initial_interval;
        let mut attempts = 0;

        loop {
            attempts += 1;

            // An errored observation counts as unhealthy; the gate only
            // passes on a positive signal.
            let healthy = compute
                .health(&self.target.name)
                .await
                .unwrap_or(false);

            if healthy {
                tracing::info!(target = %self.target.name, attempts, "health gate passed");
                return Ok(self.transition());
            }

            let exhausted = attempts >= health.max_attempts
                || start.elapsed() + interval > health.timeout;
            if exhausted {
                return Err((
                    self,
                    RolloutError::HealthTimeout {
                        budget_secs: health.timeout.as_secs(),
                        attempts,
                    },
                ));
            }

            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(health.max_interval);
        }
    }

    /// Rollback: reissue the previous confirmed digest. Attempted exactly
    /// once per failed rollout; a first deploy has nothing to restore and
    /// rolls back trivially.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::RollbackFailed` if the reissue fails. The
    /// target is then in an unknown state and the failure must be surfaced
    /// for manual intervention, never retried.
    #[must_use = "rollout state must be used"]
    pub async fn roll_back<C: ComputeOps>(
        self,
        compute: &C,
    ) -> Result<Rollout<RolledBack>, RolloutError> {
        match self.previous.clone() {
            None => {
                tracing::warn!(target = %self.target.name, "first deploy failed, nothing to restore");
                Ok(self.transition())
            }
            Some(previous) => {
                tracing::warn!(target = %self.target.name, digest = %previous.short(), "rolling back");
                compute
                    .replace(&self.target.name, &previous)
                    .await
                    .map_err(RolloutError::RollbackFailed)?;
                Ok(self.transition())
            }
        }
    }
}

