// ABOUTME: In-process mutual exclusion for runs and rollouts.
// ABOUTME: One non-terminal run per branch; one rollout per target.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::types::{BranchName, RunId, TargetName};

/// Rejection for a second submission while a branch's run is non-terminal.
#[derive(Debug, Clone, Error)]
#[error("a run for branch '{branch}' is already in progress ({holder})")]
pub struct RunInProgress {
    pub branch: String,
    pub holder: RunId,
}

type BranchTable = Arc<Mutex<HashMap<String, RunId>>>;

/// The branch-to-run table behind the at-most-one-concurrent-run rule.
///
/// This is the only mutable state shared across concurrent runs; every
/// access goes through the one mutex. The guard releases on drop, so a
/// panicking run cannot wedge its branch.
#[derive(Debug, Clone, Default)]
pub struct BranchLocks {
    table: BranchTable,
}

impl BranchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a branch for a run.
    ///
    /// # Errors
    ///
    /// Returns `RunInProgress` naming the holder when the branch already
    /// has a non-terminal run.
    pub fn acquire(&self, branch: &BranchName, run: &RunId) -> Result<BranchGuard, RunInProgress> {
        let mut table = self.table.lock();

        if let Some(holder) = table.get(branch.as_str()) {
            return Err(RunInProgress {
                branch: branch.to_string(),
                holder: holder.clone(),
            });
        }

        table.insert(branch.as_str().to_string(), run.clone());

        Ok(BranchGuard {
            table: Arc::clone(&self.table),
            branch: branch.as_str().to_string(),
        })
    }
}

/// A held branch claim that releases on drop.
#[derive(Debug)]
pub struct BranchGuard {
    table: BranchTable,
    branch: String,
}

impl Drop for BranchGuard {
    fn drop(&mut self) {
        self.table.lock().remove(&self.branch);
    }
}

/// Per-target serialization for rollouts.
///
/// Each target is owned exclusively by one rollout task for the duration
/// of that rollout; a second rollout against the same target queues behind
/// the first rather than interleaving. Locks are async because they are
/// held across the rollout's awaits.
#[derive(Debug, Clone, Default)]
pub struct TargetLocks {
    table: Arc<Mutex<HashMap<TargetName, Arc<tokio::sync::Mutex<()>>>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialization lock for a target, created on first use.
    pub fn for_target(&self, target: &TargetName) -> Arc<tokio::sync::Mutex<()>> {
        let mut table = self.table.lock();
        Arc::clone(
            table
                .entry(target.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
