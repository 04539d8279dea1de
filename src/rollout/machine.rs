// ABOUTME: Generic rollout struct parameterized by state marker.
// ABOUTME: Carries the target, desired digest, and last confirmed digest.

use std::marker::PhantomData;

use crate::config::TargetConfig;
use crate::types::{Digest, TargetName};

use super::state::{Committed, Pending, RolledBack};

/// A rollout in progress, parameterized by its current state.
///
/// The desired digest is what the rollout converges on; `previous` is the
/// digest the compute layer reported confirmed before anything changed
/// (`None` on a first deploy) and is what a rollback reissues.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) target: TargetConfig,
    pub(crate) desired: Digest,
    pub(crate) previous: Option<Digest>,
    pub(crate) skipped: bool,
    pub(crate) _state: PhantomData<S>,
}

impl Rollout<Pending> {
    /// Start a rollout toward `desired` on a target whose last confirmed
    /// digest is `previous`.
    pub fn new(target: TargetConfig, desired: Digest, previous: Option<Digest>) -> Self {
        Rollout {
            target,
            desired,
            previous,
            skipped: false,
            _state: PhantomData,
        }
    }
}

impl<S> Rollout<S> {
    pub fn target_name(&self) -> &TargetName {
        &self.target.name
    }

    pub fn desired_digest(&self) -> &Digest {
        &self.desired
    }

    /// The digest confirmed healthy before this rollout started.
    pub fn previous_digest(&self) -> Option<&Digest> {
        self.previous.as_ref()
    }
}

impl Rollout<Committed> {
    /// The digest now confirmed on the target.
    pub fn confirmed_digest(&self) -> &Digest {
        &self.desired
    }

    /// Whether the commit was a no-op (target was already at the desired
    /// digest, so no replace was issued).
    pub fn was_skipped(&self) -> bool {
        self.skipped
    }
}

impl Rollout<RolledBack> {
    /// The digest restored by the rollback (`None` when a first deploy
    /// failed and there was nothing to restore).
    pub fn restored_digest(&self) -> Option<&Digest> {
        self.previous.as_ref()
    }
}
