// ABOUTME: Per-target rollout results consumed by the run summary.
// ABOUTME: Records digests, terminal status, and the rollback attempt.

use serde::Serialize;

use crate::types::{Digest, Environment, TargetName};

/// Terminal state of one target's rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutStatus {
    /// The desired digest passed its health gate and is confirmed.
    Committed,
    /// The replace instruction (or pre-rollout observation) failed;
    /// nothing changed on the target.
    UpdateFailed,
    /// The health gate failed and the previous digest was restored.
    RolledBack,
    /// The health gate failed and the rollback also failed; the target
    /// needs manual intervention.
    RollbackFailed,
}

/// What one rollout did to one target.
#[derive(Debug, Clone, Serialize)]
pub struct RolloutOutcome {
    pub target: TargetName,
    pub environment: Environment,
    /// Digest the rollout converged on.
    pub desired: Digest,
    /// Confirmed digest before the rollout (empty on first deploy).
    pub previous: Option<Digest>,
    /// Last digest confirmed healthy after the rollout. Only a Committed
    /// transition moves this to `desired`; an observer never sees an
    /// unconfirmed digest here.
    pub confirmed: Option<Digest>,
    pub status: RolloutStatus,
    /// True when the target was already at the desired digest and no
    /// replace was issued.
    pub skipped: bool,
    pub rollback_attempted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RolloutOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == RolloutStatus::Committed
    }

    /// RollbackFailed leaves a target in an unknown runtime state; the run
    /// summary calls these out separately and slipway never retries them.
    pub fn needs_manual_intervention(&self) -> bool {
        self.status == RolloutStatus::RollbackFailed
    }
}
