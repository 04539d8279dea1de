// ABOUTME: Unified pipeline stage error with SNAFU pattern.
// ABOUTME: Classifies why an accepted run failed before reaching rollout.

use snafu::Snafu;

use crate::build::BuildError;
use crate::registry::PublishError;

/// Why an accepted run failed before (or instead of) rolling out.
///
/// Rollout failures are not represented here: they are contained per
/// target and reported through `RolloutOutcome`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("build failed after {attempts} attempt(s): {source}"))]
    Build { attempts: u32, source: BuildError },

    #[snafu(display("publish failed: {source}"))]
    Publish { source: PublishError },

    #[snafu(display("run cancelled before rollout"))]
    Cancelled,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    Build,
    Publish,
    Cancelled,
}

impl PipelineError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Build { .. } => PipelineErrorKind::Build,
            PipelineError::Publish { .. } => PipelineErrorKind::Publish,
            PipelineError::Cancelled => PipelineErrorKind::Cancelled,
        }
    }
}
