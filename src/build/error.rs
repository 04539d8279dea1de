// ABOUTME: Error types for artifact builds.
// ABOUTME: Build failures are recoverable by retry, never fatal by themselves.

use thiserror::Error;

/// Errors from the build collaborator.
///
/// Every variant is retryable; the orchestrator applies the configured
/// retry bound before marking the run Failed.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build command could not be started at all.
    #[error("failed to start build command: {0}")]
    Spawn(String),

    /// The build command ran and exited non-zero.
    #[error("build command failed with exit code {code:?}")]
    CommandFailed {
        code: Option<i32>,
        /// Captured build output, preserved for the run summary.
        log: String,
    },

    /// The build command succeeded but did not report a parseable digest.
    #[error("build command did not report a valid digest: {0}")]
    MalformedDigest(String),
}

impl BuildError {
    /// Captured build output, when the failure produced any.
    pub fn log(&self) -> Option<&str> {
        match self {
            BuildError::CommandFailed { log, .. } => Some(log),
            _ => None,
        }
    }
}
