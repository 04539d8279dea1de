// ABOUTME: Registry publisher seam and types.
// ABOUTME: Pushes artifacts under branch-derived tags with verification.

mod command;
mod error;
mod publisher;

pub use command::CommandRegistry;
pub use error::{PublishError, PublishErrorKind, RegistryError};
pub use publisher::Publisher;

use crate::types::{Digest, RegistryTag};
use async_trait::async_trait;
use serde::Serialize;

/// The artifact store collaborator.
///
/// Tags are mutable pointers; digests are immutable. `resolve_tag` is the
/// read side the publisher uses both for idempotence (skip a push the
/// registry already has) and for post-push verification.
#[async_trait]
pub trait RegistryOps: Send + Sync {
    async fn push(&self, digest: &Digest, tag: &RegistryTag) -> Result<(), RegistryError>;

    async fn resolve_tag(&self, tag: &RegistryTag) -> Result<Option<Digest>, RegistryError>;
}

/// A verified tag-to-digest binding in the remote registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedTag {
    pub tag: RegistryTag,
    pub digest: Digest,
}
