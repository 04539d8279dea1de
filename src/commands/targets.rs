// ABOUTME: Targets command implementation.
// ABOUTME: Prints the validated branch-to-target mapping.

use slipway::config::Config;
use slipway::error::{Error, Result};
use slipway::resolve::TargetResolver;
use slipway::types::BranchName;

/// Print the branch-to-target mapping, optionally for one branch.
pub fn targets(config: Config, branch: Option<&str>) -> Result<()> {
    let resolver =
        TargetResolver::new(&config.branches).map_err(|e| Error::InvalidConfig(e.to_string()))?;

    match branch {
        Some(name) => {
            let branch = BranchName::new(name).map_err(|e| Error::InvalidConfig(e.to_string()))?;
            let resolved = resolver.resolve(&branch);
            if resolved.is_empty() {
                println!("{branch}: no targets (pipeline is a no-op)");
            } else {
                print_branch(&branch, resolved);
            }
        }
        None => {
            let mut mapped: Vec<_> = resolver.mapped_branches().collect();
            mapped.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
            for (branch, resolved) in mapped {
                print_branch(branch, resolved);
            }
        }
    }

    Ok(())
}

fn print_branch(branch: &BranchName, targets: &[slipway::config::TargetConfig]) {
    println!("{branch}:");
    for target in targets {
        println!(
            "  {} [{}] health={}",
            target.name, target.environment, target.health_endpoint
        );
    }
}
