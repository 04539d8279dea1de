// ABOUTME: Tests for rollout state transitions.
// ABOUTME: Verifies transition methods exist and return correct state types.

mod support;

use slipway::compute::ComputeOps;
use slipway::config::HealthConfig;
use slipway::rollout::{
    Committed, Dispatched, Pending, RolledBack, Rollout, RolloutError, Updating,
};
use slipway::types::Environment;
use support::{FakeCompute, HealthScript, digest, fast_health, target};

// =============================================================================
// Transition Type Signature Tests
// =============================================================================

/// Test: Verifies the type signatures of all transition methods compile
/// correctly. This ensures the state machine is wired up properly at
/// compile time.
#[test]
fn transition_type_signatures_compile() {
    // This function is never called, but it must compile.
    // If any type signature is wrong, this will fail to compile.
    #[allow(dead_code)]
    async fn check_signatures<C: ComputeOps>(compute: &C, health: &HealthConfig) {
        let rollout: Rollout<Pending> = Rollout::new(
            target("dev-target", Environment::Development),
            digest('b'),
            Some(digest('a')),
        );

        // Pending -> Updating | Committed
        let dispatched: Result<Dispatched, RolloutError> = rollout.dispatch(compute).await;

        let updating: Rollout<Updating> = match dispatched.unwrap() {
            Dispatched::AlreadyCurrent(committed) => {
                let _: Rollout<Committed> = committed;
                return;
            }
            Dispatched::Updating(updating) => updating,
        };

        // Updating -> Committed (with rollback option on failure)
        let checked: Result<Rollout<Committed>, (Rollout<Updating>, RolloutError)> =
            updating.health_check(compute, health).await;

        // Updating -> RolledBack
        if let Err((updating, _error)) = checked {
            let _: Result<Rollout<RolledBack>, RolloutError> = updating.roll_back(compute).await;
        }
    }
}

// =============================================================================
// Transition Behavior
// =============================================================================

/// Test: dispatch issues a replace and moves to Updating.
#[tokio::test]
async fn dispatch_moves_to_updating() {
    let compute = FakeCompute::new().running("dev-target", digest('a'));

    let rollout = Rollout::new(
        target("dev-target", Environment::Development),
        digest('b'),
        Some(digest('a')),
    );

    match rollout.dispatch(&compute).await.unwrap() {
        Dispatched::Updating(updating) => {
            assert_eq!(updating.desired_digest(), &digest('b'));
            assert_eq!(updating.previous_digest(), Some(&digest('a')));
        }
        Dispatched::AlreadyCurrent(_) => panic!("expected an Updating transition"),
    }
    assert_eq!(compute.replace_count(), 1);
}

/// Test: dispatch short-circuits when the target is already current.
#[tokio::test]
async fn dispatch_skips_when_already_current() {
    let compute = FakeCompute::new().running("dev-target", digest('b'));

    let rollout = Rollout::new(
        target("dev-target", Environment::Development),
        digest('b'),
        Some(digest('b')),
    );

    match rollout.dispatch(&compute).await.unwrap() {
        Dispatched::AlreadyCurrent(committed) => {
            assert!(committed.was_skipped());
            assert_eq!(committed.confirmed_digest(), &digest('b'));
        }
        Dispatched::Updating(_) => panic!("expected the no-op short-circuit"),
    }
    assert_eq!(compute.replace_count(), 0);
}

/// Test: a failing health gate returns the Updating state for rollback.
#[tokio::test]
async fn failed_health_check_returns_state_for_rollback() {
    let compute = FakeCompute::new()
        .running("dev-target", digest('a'))
        .health_script("dev-target", HealthScript::Never);

    let rollout = Rollout::new(
        target("dev-target", Environment::Development),
        digest('b'),
        Some(digest('a')),
    );

    let updating = match rollout.dispatch(&compute).await.unwrap() {
        Dispatched::Updating(updating) => updating,
        Dispatched::AlreadyCurrent(_) => panic!("expected an Updating transition"),
    };

    let (updating, error) = updating
        .health_check(&compute, &fast_health())
        .await
        .unwrap_err();
    assert_eq!(
        error.kind(),
        slipway::rollout::RolloutErrorKind::HealthTimeout
    );

    let rolled_back = updating.roll_back(&compute).await.unwrap();
    assert_eq!(rolled_back.restored_digest(), Some(&digest('a')));
    assert_eq!(compute.running_digest("dev-target"), Some(digest('a')));
}
