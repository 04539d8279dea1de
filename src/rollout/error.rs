// ABOUTME: Error types for rollout operations.
// ABOUTME: Kinds distinguish update, health-gate, and rollback failures.

use crate::compute::ComputeError;
use thiserror::Error;

/// Errors that can occur during rollout state transitions.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// The replace instruction (or the pre-rollout observation) failed;
    /// nothing was changed on the target.
    #[error("failed to update target: {0}")]
    UpdateFailed(ComputeError),

    /// The target never reported healthy within the configured bounds.
    #[error("health check did not pass within {budget_secs}s ({attempts} attempt(s))")]
    HealthTimeout { budget_secs: u64, attempts: u32 },

    /// Reissuing the previous confirmed digest failed. The target is in an
    /// unknown runtime state and requires manual intervention; slipway
    /// never retries past this.
    #[error("rollback failed, target requires manual intervention: {0}")]
    RollbackFailed(ComputeError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutErrorKind {
    UpdateFailed,
    HealthTimeout,
    RollbackFailed,
}

impl RolloutError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RolloutErrorKind {
        match self {
            RolloutError::UpdateFailed(_) => RolloutErrorKind::UpdateFailed,
            RolloutError::HealthTimeout { .. } => RolloutErrorKind::HealthTimeout,
            RolloutError::RollbackFailed(_) => RolloutErrorKind::RollbackFailed,
        }
    }
}
