// ABOUTME: Artifact builder seam and types.
// ABOUTME: Turns a commit revision into a content-addressed artifact.

mod artifact;
mod command;
mod error;

pub use artifact::{Artifact, BuildLog};
pub use command::CommandBuilder;
pub use error::BuildError;

use crate::types::Revision;
use async_trait::async_trait;

/// The build collaborator: commit tree in, tagged content-addressed
/// artifact out.
///
/// Builds are content-addressed, not revision-addressed: identical source
/// content yields the identical digest, so re-running a failed pipeline at
/// the same revision is cheap for a well-behaved builder.
#[async_trait]
pub trait BuildOps: Send + Sync {
    async fn build(&self, revision: &Revision) -> Result<Artifact, BuildError>;
}
