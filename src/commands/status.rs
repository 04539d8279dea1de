// ABOUTME: Status command implementation.
// ABOUTME: Lists persisted runs or shows one run record in full.

use slipway::config::Config;
use slipway::error::Result;
use slipway::pipeline::{PipelineRun, RunStore, StepOutcome};

/// Show persisted pipeline runs from the state directory.
pub fn status(config: Config, run_id: Option<&str>, json: bool) -> Result<()> {
    let store = RunStore::new(config.state_dir());

    match run_id {
        Some(id) => {
            let run = store.load(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                print_run(&run, true);
            }
        }
        None => {
            let runs = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&runs)?);
            } else if runs.is_empty() {
                println!("No pipeline runs recorded");
            } else {
                for run in &runs {
                    print_run(run, false);
                }
            }
        }
    }

    Ok(())
}

fn print_run(run: &PipelineRun, detailed: bool) {
    println!(
        "{}  {}  {} @ {}  {}",
        run.started_at.format("%Y-%m-%d %H:%M:%S"),
        run.state,
        run.event.branch,
        run.event.revision.short(),
        run.id,
    );

    if !detailed {
        return;
    }

    println!("  host: {}", run.runner_host);
    for record in &run.steps {
        match &record.outcome {
            StepOutcome::Succeeded => println!("  {}: ok", record.step),
            StepOutcome::Failed(reason) => println!("  {}: failed - {reason}", record.step),
            StepOutcome::Skipped(reason) => println!("  {}: skipped ({reason})", record.step),
        }
    }
}
