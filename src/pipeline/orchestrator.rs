// ABOUTME: Top-level pipeline state machine driving one run per commit event.
// ABOUTME: Sequences resolve, build, publish, then fans out per-target rollouts.

use futures::future::join_all;

use crate::build::{Artifact, BuildOps};
use crate::compute::ComputeOps;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::registry::{Publisher, RegistryOps};
use crate::resolve::{ResolutionError, TargetResolver};
use crate::rollout;

use super::cancel::CancelFlag;
use super::error::PipelineError;
use super::lock::{BranchLocks, RunInProgress, TargetLocks};
use super::report::RunReport;
use super::run::{CommitEvent, PipelineRun, RunState, Step, StepOutcome};
use super::store::RunStore;

/// The pipeline orchestrator.
///
/// Generic over its three collaborators so tests run against in-memory
/// fakes and production runs against the command-backed adapters. All
/// configuration is threaded in at construction; two orchestrators in one
/// process share nothing and can run with independent configs.
pub struct Orchestrator<B, R, C> {
    config: Config,
    resolver: TargetResolver,
    publisher: Publisher,
    builder: B,
    registry: R,
    compute: C,
    branch_locks: BranchLocks,
    target_locks: TargetLocks,
    store: Option<RunStore>,
}

impl<B, R, C> Orchestrator<B, R, C>
where
    B: BuildOps,
    R: RegistryOps,
    C: ComputeOps,
{
    /// Build an orchestrator, validating the branch mapping.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError` when the mapping is defective.
    pub fn new(config: Config, builder: B, registry: R, compute: C) -> Result<Self, ResolutionError> {
        let resolver = TargetResolver::new(&config.branches)?;
        let publisher = Publisher::new(config.registry.push_retries, config.registry.verify_retries);

        Ok(Self {
            config,
            resolver,
            publisher,
            builder,
            registry,
            compute,
            branch_locks: BranchLocks::new(),
            target_locks: TargetLocks::new(),
            store: None,
        })
    }

    /// Attach a run store; records and build logs persist there.
    pub fn with_store(mut self, store: RunStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    /// Ingest a commit event and drive its run to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns `RunInProgress` when the branch already has a non-terminal
    /// run; no run is created. Every accepted event yields a report, even
    /// when the run fails.
    pub async fn submit(&self, event: CommitEvent) -> Result<RunReport, RunInProgress> {
        self.submit_cancellable(event, &CancelFlag::new()).await
    }

    /// `submit` with cooperative cancellation, honored at stage boundaries
    /// until the rollout fan-out begins.
    pub async fn submit_cancellable(
        &self,
        event: CommitEvent,
        cancel: &CancelFlag,
    ) -> Result<RunReport, RunInProgress> {
        let mut run = PipelineRun::new(event);
        let _guard = self.branch_locks.acquire(&run.event.branch, &run.id)?;

        tracing::info!(
            run = %run.id,
            branch = %run.event.branch,
            revision = %run.event.revision.short(),
            "run accepted"
        );

        let mut diag = Diagnostics::default();
        let report = self.drive(&mut run, cancel, &mut diag).await;
        self.persist(&report.run, &mut diag);
        Ok(report)
    }

    /// The run state machine proper. Consumes failures into the report;
    /// only the branch guard lives outside.
    async fn drive(
        &self,
        run: &mut PipelineRun,
        cancel: &CancelFlag,
        diag: &mut Diagnostics,
    ) -> RunReport {
        // The mapping is a pure function, so an unmapped branch is known
        // before any side effect: short-circuit as a no-op success.
        let targets = self.resolver.resolve(&run.event.branch).to_vec();
        if targets.is_empty() {
            run.advance(RunState::Resolving);
            run.record(Step::Resolve, StepOutcome::Succeeded);
            let reason = format!("branch '{}' maps to no targets", run.event.branch);
            run.record(Step::Build, StepOutcome::Skipped(reason.clone()));
            run.record(Step::Publish, StepOutcome::Skipped(reason.clone()));
            run.record(Step::Rollout, StepOutcome::Skipped(reason));
            run.advance(RunState::Succeeded);
            return self.report(run.clone(), None, None, Vec::new(), None, None);
        }

        // Build.
        if let Some(report) = self.check_cancelled(run, cancel, Step::Build) {
            return report;
        }
        run.advance(RunState::Building);
        let artifact = match self.build_with_retries(&run.event).await {
            Ok(artifact) => {
                run.advance(RunState::Built);
                run.record(Step::Build, StepOutcome::Succeeded);
                artifact
            }
            Err((attempts, source)) => {
                let failure = PipelineError::Build { attempts, source };
                run.record(Step::Build, StepOutcome::Failed(failure.to_string()));
                run.advance(RunState::Failed);
                return self.report(run.clone(), None, None, Vec::new(), Some(failure), None);
            }
        };

        let build_log_path = self.persist_build_log(run, &artifact, diag);

        // Publish.
        if let Some(report) = self.check_cancelled(run, cancel, Step::Publish) {
            return report;
        }
        run.advance(RunState::Publishing);
        let published = match self
            .publisher
            .publish(&self.registry, &artifact, &run.event.branch)
            .await
        {
            Ok(published) => {
                run.advance(RunState::Published);
                run.record(Step::Publish, StepOutcome::Succeeded);
                published
            }
            Err(source) => {
                let failure = PipelineError::Publish { source };
                run.record(Step::Publish, StepOutcome::Failed(failure.to_string()));
                run.advance(RunState::Failed);
                return self.report(
                    run.clone(),
                    Some(artifact.digest.clone()),
                    None,
                    Vec::new(),
                    Some(failure),
                    build_log_path,
                );
            }
        };

        // Resolution already happened (it gates the whole run); record it
        // at its place in the state sequence.
        run.advance(RunState::Resolving);
        run.record(Step::Resolve, StepOutcome::Succeeded);

        if let Some(report) = self.check_cancelled(run, cancel, Step::Rollout) {
            return report;
        }

        // Fan out one rollout per target. Targets are independent compute
        // resources; a failure on one never cancels its siblings. Each
        // task holds its target's serialization lock for the duration.
        run.advance(RunState::RollingOut);
        let rollouts = join_all(targets.into_iter().map(|target| {
            let lock = self.target_locks.for_target(&target.name);
            let desired = published.digest.clone();
            async move {
                let _target_guard = lock.lock().await;
                rollout::execute(target, desired, &self.config.health, &self.compute).await
            }
        }))
        .await;

        let all_committed = rollouts.iter().all(|outcome| outcome.succeeded());
        if all_committed {
            run.record(Step::Rollout, StepOutcome::Succeeded);
            run.advance(RunState::Succeeded);
        } else {
            let failed = rollouts
                .iter()
                .filter(|outcome| !outcome.succeeded())
                .map(|outcome| outcome.target.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            run.record(
                Step::Rollout,
                StepOutcome::Failed(format!("target(s) did not commit: {failed}")),
            );
            run.advance(RunState::Failed);
        }

        self.report(
            run.clone(),
            Some(artifact.digest),
            Some(published),
            rollouts,
            None,
            build_log_path,
        )
    }

    async fn build_with_retries(
        &self,
        event: &CommitEvent,
    ) -> Result<Artifact, (u32, crate::build::BuildError)> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.builder.build(&event.revision).await {
                Ok(artifact) => return Ok(artifact),
                Err(e) if attempts > self.config.build.retries => {
                    return Err((attempts, e));
                }
                Err(e) => {
                    tracing::warn!(attempt = attempts, error = %e, "build failed, retrying");
                }
            }
        }
    }

    /// Cancellation checkpoint ahead of `next_step`. Returns the terminal
    /// report when the run was cancelled.
    fn check_cancelled(
        &self,
        run: &mut PipelineRun,
        cancel: &CancelFlag,
        next_step: Step,
    ) -> Option<RunReport> {
        if !cancel.is_cancelled() {
            return None;
        }

        let failure = PipelineError::Cancelled;
        run.record(next_step, StepOutcome::Failed(failure.to_string()));
        run.advance(RunState::Failed);
        Some(self.report(run.clone(), None, None, Vec::new(), Some(failure), None))
    }

    fn persist_build_log(
        &self,
        run: &PipelineRun,
        artifact: &Artifact,
        diag: &mut Diagnostics,
    ) -> Option<std::path::PathBuf> {
        let store = self.store.as_ref()?;
        if artifact.build_log.is_empty() {
            return None;
        }

        match store.save_build_log(&run.id, &artifact.build_log) {
            Ok(path) => Some(path),
            Err(e) => {
                diag.warn(Warning::persistence(format!(
                    "failed to save build log: {e}"
                )));
                None
            }
        }
    }

    fn persist(&self, run: &PipelineRun, diag: &mut Diagnostics) {
        if let Some(store) = &self.store
            && let Err(e) = store.save(run)
        {
            diag.warn(Warning::persistence(format!(
                "failed to save run record: {e}"
            )));
        }
    }

    fn report(
        &self,
        run: PipelineRun,
        artifact_digest: Option<crate::types::Digest>,
        published: Option<crate::registry::PublishedTag>,
        rollouts: Vec<crate::rollout::RolloutOutcome>,
        failure: Option<PipelineError>,
        build_log_path: Option<std::path::PathBuf>,
    ) -> RunReport {
        RunReport {
            run,
            artifact_digest,
            published,
            rollouts,
            failure,
            build_log_path,
        }
    }
}
