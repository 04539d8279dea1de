// ABOUTME: Human-readable run summary and exit-code mapping.
// ABOUTME: Enumerates per-stage and per-target outcomes, worst news first.

use std::path::PathBuf;

use crate::registry::PublishedTag;
use crate::rollout::{RolloutOutcome, RolloutStatus};
use crate::types::Digest;

use super::error::PipelineError;
use super::run::{PipelineRun, RunState, StepOutcome};

/// Everything one `submit` produced: the run record, per-target outcomes,
/// and the stage failure when the run never reached rollout.
#[derive(Debug)]
pub struct RunReport {
    pub run: PipelineRun,
    pub artifact_digest: Option<Digest>,
    pub published: Option<PublishedTag>,
    pub rollouts: Vec<RolloutOutcome>,
    pub failure: Option<PipelineError>,
    pub build_log_path: Option<PathBuf>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.run.state == RunState::Succeeded
    }

    /// Process exit code: 0 on Succeeded, 1 on Failed.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() { 0 } else { 1 }
    }

    /// Render the run summary for the log stream.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let run = &self.run;

        out.push_str(&format!(
            "run {} ({} @ {}): {}\n",
            run.id,
            run.event.branch,
            run.event.revision.short(),
            run.state,
        ));

        for record in &run.steps {
            let line = match &record.outcome {
                StepOutcome::Succeeded => format!("  {}: ok", record.step),
                StepOutcome::Failed(reason) => format!("  {}: failed - {}", record.step, reason),
                StepOutcome::Skipped(reason) => format!("  {}: skipped ({})", record.step, reason),
            };
            out.push_str(&line);
            out.push('\n');
        }

        if let Some(tag) = &self.published {
            out.push_str(&format!(
                "  tag {} -> {}\n",
                tag.tag,
                tag.digest.short()
            ));
        }

        for outcome in &self.rollouts {
            out.push_str(&format!("  {}\n", render_rollout(outcome)));
        }

        if self
            .rollouts
            .iter()
            .any(RolloutOutcome::needs_manual_intervention)
        {
            out.push_str("  !! one or more targets require manual intervention\n");
        }

        if let Some(path) = &self.build_log_path {
            out.push_str(&format!("  build log: {}\n", path.display()));
        }

        out
    }
}

fn render_rollout(outcome: &RolloutOutcome) -> String {
    let target = format!("{} [{}]", outcome.target, outcome.environment);
    let from = outcome
        .previous
        .as_ref()
        .map(Digest::short)
        .unwrap_or("none")
        .to_string();

    match outcome.status {
        RolloutStatus::Committed if outcome.skipped => {
            format!("{target}: already at {} (no-op)", outcome.desired.short())
        }
        RolloutStatus::Committed => {
            format!("{target}: committed {from} -> {}", outcome.desired.short())
        }
        RolloutStatus::UpdateFailed => format!(
            "{target}: update failed, still at {from} - {}",
            outcome.error.as_deref().unwrap_or("unknown error"),
        ),
        RolloutStatus::RolledBack => format!(
            "{target}: rolled back to {from} - {}",
            outcome.error.as_deref().unwrap_or("unknown error"),
        ),
        RolloutStatus::RollbackFailed => format!(
            "{target}: ROLLBACK FAILED, state unknown - {}",
            outcome.error.as_deref().unwrap_or("unknown error"),
        ),
    }
}
