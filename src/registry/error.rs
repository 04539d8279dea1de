// ABOUTME: Error types for registry publication.
// ABOUTME: Push failures retry; verification mismatches are fatal to a run.

use crate::types::Digest;
use thiserror::Error;

/// Errors from the registry collaborator itself.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    #[error("registry rejected the operation: {0}")]
    Rejected(String),

    #[error("registry returned malformed data: {0}")]
    Malformed(String),
}

/// Errors from the publish operation.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The push itself failed after the configured retries.
    #[error("push failed after {attempts} attempt(s): {source}")]
    Push {
        attempts: u32,
        source: RegistryError,
    },

    /// The tag did not point at the pushed digest on re-read. This means
    /// the registry is inconsistent (or something else moved the tag) and
    /// must never be silently ignored.
    #[error("tag verification failed: expected {expected}, registry reports {found:?}")]
    Verification {
        expected: Digest,
        found: Option<Digest>,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    Push,
    Verification,
}

impl PublishError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PublishErrorKind {
        match self {
            PublishError::Push { .. } => PublishErrorKind::Push,
            PublishError::Verification { .. } => PublishErrorKind::Verification,
        }
    }
}
