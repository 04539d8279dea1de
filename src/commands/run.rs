// ABOUTME: Run command implementation: one commit event, one pipeline run.
// ABOUTME: Wires the production adapters into the orchestrator.

use std::io::Read;

use slipway::build::CommandBuilder;
use slipway::compute::CommandCompute;
use slipway::config::Config;
use slipway::error::{Error, Result};
use slipway::output::Output;
use slipway::pipeline::{CommitEvent, Orchestrator, RunStore};
use slipway::registry::CommandRegistry;
use slipway::types::{BranchName, Revision};

/// Parse the commit event from CLI arguments or a JSON document.
pub fn parse_event(
    branch: Option<&str>,
    revision: Option<&str>,
    event_source: Option<&str>,
) -> Result<CommitEvent> {
    if let Some(source) = event_source {
        let json = if source == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(Error::Io)?;
            buf
        } else {
            std::fs::read_to_string(source)?
        };

        return serde_json::from_str(&json).map_err(|e| Error::InvalidEvent(e.to_string()));
    }

    // clap guarantees both are present when --event is absent.
    let branch = BranchName::new(branch.unwrap_or_default())
        .map_err(|e| Error::InvalidEvent(e.to_string()))?;
    let revision = Revision::parse(revision.unwrap_or_default())
        .map_err(|e| Error::InvalidEvent(e.to_string()))?;

    Ok(CommitEvent::new(branch, revision))
}

/// Drive one pipeline run and return the process exit code.
pub async fn run(config: Config, event: CommitEvent, mut output: Output) -> Result<i32> {
    output.start_timer();
    output.progress(&format!(
        "Pipeline run for {} @ {}",
        event.branch,
        event.revision.short()
    ));

    let store = RunStore::new(config.state_dir());
    let builder = CommandBuilder::new(config.build.clone());
    let registry = CommandRegistry::new(config.registry.clone())?;
    let compute = CommandCompute::new(&config);

    let orchestrator = Orchestrator::new(config, builder, registry, compute)
        .map_err(|e| Error::InvalidConfig(e.to_string()))?
        .with_store(store);

    match orchestrator.submit(event).await {
        Err(rejected) => {
            output.error(&rejected.to_string());
            Ok(1)
        }
        Ok(report) => {
            let record = serde_json::json!({
                "run": report.run,
                "rollouts": report.rollouts,
            });
            output.run_summary(&report.render(), &record);
            Ok(report.exit_code())
        }
    }
}
