// ABOUTME: Deployment target resolution from the branch mapping.
// ABOUTME: Pure lookup; unmapped branches resolve to no targets.

use std::collections::HashMap;

use crate::config::{BranchMapping, TargetConfig};
use crate::types::BranchName;
use thiserror::Error;

/// Configuration defects in the branch mapping.
///
/// These surface at resolver construction, not per commit event: an
/// unmapped branch is a normal no-op, but a malformed mapping is an
/// operator error that must fail fast.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The per-target serialization rule keys on target name, so one
    /// target reachable from two branches could be mutated by two
    /// concurrent runs.
    #[error("target '{target}' is mapped more than once (from '{first}' and '{second}')")]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },
}

/// Maps a source branch to the ordered deployment targets it rolls out to.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    branches: HashMap<BranchName, Vec<TargetConfig>>,
}

impl TargetResolver {
    /// Validate the mapping and build a resolver.
    ///
    /// Every target name must be unique across the whole mapping: a name
    /// repeated under one branch would fan out two concurrent rollouts to
    /// the same target, and one shared across branches would let two runs
    /// mutate it.
    pub fn new(mapping: &HashMap<BranchName, BranchMapping>) -> Result<Self, ResolutionError> {
        let mut owners: HashMap<String, &BranchName> = HashMap::new();

        for (branch, entry) in mapping {
            for target in &entry.targets {
                let key = target.name.as_str().to_string();
                if let Some(first) = owners.get(&key) {
                    return Err(ResolutionError::DuplicateTarget {
                        target: key,
                        first: first.to_string(),
                        second: branch.to_string(),
                    });
                }
                owners.insert(key, branch);
            }
        }

        let branches = mapping
            .iter()
            .map(|(branch, entry)| {
                (
                    branch.clone(),
                    entry.targets.iter().cloned().collect::<Vec<_>>(),
                )
            })
            .collect();

        Ok(Self { branches })
    }

    /// Resolve a branch to its targets. Pure; empty for unmapped branches.
    pub fn resolve(&self, branch: &BranchName) -> &[TargetConfig] {
        self.branches
            .get(branch)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All mapped branches, for the `targets` listing command.
    pub fn mapped_branches(&self) -> impl Iterator<Item = (&BranchName, &[TargetConfig])> {
        self.branches
            .iter()
            .map(|(branch, targets)| (branch, targets.as_slice()))
    }
}
