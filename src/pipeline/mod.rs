// ABOUTME: Pipeline orchestration: runs, locks, persistence, and reports.
// ABOUTME: Exports the Orchestrator driving commit events to terminal states.

mod cancel;
mod error;
mod lock;
mod orchestrator;
mod report;
mod run;
mod store;

pub use cancel::CancelFlag;
pub use error::{PipelineError, PipelineErrorKind};
pub use lock::{BranchGuard, BranchLocks, RunInProgress, TargetLocks};
pub use orchestrator::Orchestrator;
pub use report::RunReport;
pub use run::{CommitEvent, PipelineRun, RunState, Step, StepOutcome, StepRecord};
pub use store::RunStore;
