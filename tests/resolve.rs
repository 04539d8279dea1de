// ABOUTME: Tests for branch-to-target resolution.
// ABOUTME: Mapped, unmapped, ordering, and mapping-defect rejection.

mod support;

use nonempty::NonEmpty;
use slipway::config::BranchMapping;
use slipway::resolve::{ResolutionError, TargetResolver};
use slipway::types::Environment;
use std::collections::HashMap;
use support::{branch, target};

#[test]
fn mapped_branch_resolves_to_its_targets() {
    let config = support::test_config();
    let resolver = TargetResolver::new(&config.branches).unwrap();

    let resolved = resolver.resolve(&branch("development"));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name.as_str(), "dev-target");
    assert_eq!(resolved[0].environment, Environment::Development);

    let resolved = resolver.resolve(&branch("master"));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name.as_str(), "prod-target");
}

#[test]
fn unmapped_branch_resolves_empty() {
    let config = support::test_config();
    let resolver = TargetResolver::new(&config.branches).unwrap();

    assert!(resolver.resolve(&branch("feature/x")).is_empty());
    assert!(resolver.resolve(&branch("staging")).is_empty());
}

#[test]
fn target_order_is_preserved() {
    let mut targets = NonEmpty::new(target("prod-a", Environment::Production));
    targets.push(target("prod-b", Environment::Production));
    targets.push(target("prod-c", Environment::Production));

    let mut mapping = HashMap::new();
    mapping.insert(branch("master"), BranchMapping { targets });

    let resolver = TargetResolver::new(&mapping).unwrap();
    let names: Vec<_> = resolver
        .resolve(&branch("master"))
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["prod-a", "prod-b", "prod-c"]);
}

#[test]
fn duplicate_target_across_branches_is_rejected() {
    let mut mapping = HashMap::new();
    mapping.insert(
        branch("development"),
        BranchMapping {
            targets: NonEmpty::new(target("shared", Environment::Development)),
        },
    );
    mapping.insert(
        branch("master"),
        BranchMapping {
            targets: NonEmpty::new(target("shared", Environment::Production)),
        },
    );

    let err = TargetResolver::new(&mapping).unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::DuplicateTarget { target, .. } if target == "shared"
    ));
}

#[test]
fn duplicate_target_within_one_branch_is_rejected() {
    let mut targets = NonEmpty::new(target("prod-a", Environment::Production));
    targets.push(target("prod-a", Environment::Production));

    let mut mapping = HashMap::new();
    mapping.insert(branch("master"), BranchMapping { targets });

    assert!(TargetResolver::new(&mapping).is_err());
}
