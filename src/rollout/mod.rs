// ABOUTME: Rollout coordination using the type state pattern.
// ABOUTME: Drives one target from Pending to a terminal, health-gated state.

mod error;
mod machine;
mod outcome;
mod state;
mod transitions;

pub use error::{RolloutError, RolloutErrorKind};
pub use machine::Rollout;
pub use outcome::{RolloutOutcome, RolloutStatus};
pub use state::{Committed, Pending, RolledBack, Updating};
pub use transitions::{Dispatched, TransitionResult};

use crate::compute::ComputeOps;
use crate::config::{HealthConfig, TargetConfig};
use crate::types::Digest;

/// Run one target's rollout to a terminal state.
///
/// This is the coordinator's whole contract: observe the target, converge
/// it on `desired` behind the health gate, roll back at most once on
/// failure, and report what happened. It never panics and never leaves the
/// state machine mid-flight; every path ends in a `RolloutOutcome`.
pub async fn execute<C: ComputeOps>(
    target: TargetConfig,
    desired: Digest,
    health: &HealthConfig,
    compute: &C,
) -> RolloutOutcome {
    let name = target.name.clone();
    let environment = target.environment;

    // Observe the confirmed digest before touching anything; it is both
    // the no-op check and what a rollback will reissue.
    let previous = match compute.current_digest(&name).await {
        Ok(digest) => digest,
        Err(e) => {
            return RolloutOutcome {
                target: name,
                environment,
                desired,
                previous: None,
                confirmed: None,
                status: RolloutStatus::UpdateFailed,
                skipped: false,
                rollback_attempted: false,
                error: Some(RolloutError::UpdateFailed(e).to_string()),
            };
        }
    };

    let rollout = Rollout::new(target, desired.clone(), previous.clone());

    let updating = match rollout.dispatch(compute).await {
        Ok(Dispatched::AlreadyCurrent(committed)) => {
            return RolloutOutcome {
                target: name,
                environment,
                desired: desired.clone(),
                previous: previous.clone(),
                confirmed: Some(committed.confirmed_digest().clone()),
                status: RolloutStatus::Committed,
                skipped: committed.was_skipped(),
                rollback_attempted: false,
                error: None,
            };
        }
        Ok(Dispatched::Updating(updating)) => updating,
        Err(e) => {
            // Nothing was changed; the previous digest remains confirmed.
            return RolloutOutcome {
                target: name,
                environment,
                desired,
                previous: previous.clone(),
                confirmed: previous,
                status: RolloutStatus::UpdateFailed,
                skipped: false,
                rollback_attempted: false,
                error: Some(e.to_string()),
            };
        }
    };

    match updating.health_check(compute, health).await {
        Ok(committed) => RolloutOutcome {
            target: name,
            environment,
            desired: desired.clone(),
            previous,
            confirmed: Some(committed.confirmed_digest().clone()),
            status: RolloutStatus::Committed,
            skipped: false,
            rollback_attempted: false,
            error: None,
        },
        Err((updating, health_error)) => match updating.roll_back(compute).await {
            Ok(rolled_back) => RolloutOutcome {
                target: name,
                environment,
                desired,
                previous: previous.clone(),
                confirmed: rolled_back.restored_digest().cloned(),
                status: RolloutStatus::RolledBack,
                skipped: false,
                rollback_attempted: true,
                error: Some(health_error.to_string()),
            },
            Err(rollback_error) => RolloutOutcome {
                target: name,
                environment,
                desired,
                previous: previous.clone(),
                confirmed: previous,
                status: RolloutStatus::RollbackFailed,
                skipped: false,
                rollback_attempted: true,
                error: Some(format!("{health_error}; {rollback_error}")),
            },
        },
    }
}
