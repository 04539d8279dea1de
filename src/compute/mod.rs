// ABOUTME: Target compute layer interface and adapters.
// ABOUTME: Replace, current-digest, and health per deployment target.

mod command;
mod http;

pub use command::CommandCompute;
pub use http::probe_health;

use crate::types::{Digest, TargetName};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the compute collaborator.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("unknown deployment target: {0}")]
    UnknownTarget(String),

    #[error("compute layer unavailable: {0}")]
    Unavailable(String),

    #[error("compute layer rejected the operation: {0}")]
    Rejected(String),

    #[error("compute layer returned malformed data: {0}")]
    Malformed(String),

    #[error("missing compute credentials: {0}")]
    MissingCredentials(String),

    #[error("invalid health endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// The deployment platform's documented interface.
///
/// Implementations own the transport (commands, HTTP, a cloud SDK); the
/// rollout coordinator only ever speaks these three operations. `health`
/// reports an observation, not an error: an unreachable application is
/// unhealthy, not a failed call.
#[async_trait]
pub trait ComputeOps: Send + Sync {
    /// Instruct the target to replace its running artifact.
    async fn replace(&self, target: &TargetName, digest: &Digest) -> Result<(), ComputeError>;

    /// The digest currently running on the target, if anything is deployed.
    async fn current_digest(&self, target: &TargetName) -> Result<Option<Digest>, ComputeError>;

    /// Whether the target currently reports healthy.
    async fn health(&self, target: &TargetName) -> Result<bool, ComputeError>;
}
