// ABOUTME: Pipeline run records: the unit of idempotence and retry.
// ABOUTME: One commit event creates one run that ends Succeeded or Failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BranchName, RegistryTag, Revision, RunId};

/// A commit event delivered by the CI trigger. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEvent {
    pub branch: BranchName,
    pub revision: Revision,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl CommitEvent {
    pub fn new(branch: BranchName, revision: Revision) -> Self {
        Self {
            branch,
            revision,
            timestamp: Utc::now(),
        }
    }
}

/// Orchestrator states for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Received,
    Building,
    Built,
    Publishing,
    Published,
    Resolving,
    RollingOut,
    Succeeded,
    Failed,
}

impl RunState {
    /// Terminal states never change again; a new event for the branch
    /// starts a fresh run instead.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Received => "received",
            RunState::Building => "building",
            RunState::Built => "built",
            RunState::Publishing => "publishing",
            RunState::Published => "published",
            RunState::Resolving => "resolving",
            RunState::RollingOut => "rolling-out",
            RunState::Succeeded => "succeeded",
            RunState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// The pipeline stages recorded per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Resolve,
    Build,
    Publish,
    Rollout,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Resolve => "resolve",
            Step::Build => "build",
            Step::Publish => "publish",
            Step::Rollout => "rollout",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
    pub timestamp: DateTime<Utc>,
}

/// One pipeline run, created at event ingestion and mutated by the
/// orchestrator as stages complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: RunId,
    pub event: CommitEvent,
    pub state: RunState,
    pub steps: Vec<StepRecord>,
    /// Host that executed the run; CI workers are ephemeral, so the
    /// record keeps this for postmortems.
    pub runner_host: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    pub fn new(event: CommitEvent) -> Self {
        let started_at = Utc::now();
        let id = RunId::new(format!(
            "{}-{}-{}",
            RegistryTag::for_branch(&event.branch),
            event.revision.short(),
            started_at.format("%Y%m%dT%H%M%S"),
        ));

        Self {
            id,
            event,
            state: RunState::Received,
            steps: Vec::new(),
            runner_host: gethostname::gethostname().to_string_lossy().into_owned(),
            started_at,
            finished_at: None,
        }
    }

    pub fn advance(&mut self, state: RunState) {
        tracing::debug!(run = %self.id, %state, "run state");
        self.state = state;
        if state.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            step,
            outcome,
            timestamp: Utc::now(),
        });
    }

    pub fn step(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|record| record.step == step)
    }
}
