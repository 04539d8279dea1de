// ABOUTME: Publish orchestration: derive tag, idempotence check, push, verify.
// ABOUTME: Repeated publishes of the same branch+digest perform at most one push.

use crate::build::Artifact;
use crate::types::{BranchName, RegistryTag};

use super::{PublishError, PublishedTag, RegistryOps};

/// Publishes artifacts under branch-derived tags.
///
/// Tag derivation is a pure function of the branch name, so publishing is
/// idempotent: when the remote tag already points at the artifact digest,
/// the push is skipped and the existing binding returned.
#[derive(Debug, Clone)]
pub struct Publisher {
    push_retries: u32,
    verify_retries: u32,
}

impl Publisher {
    pub fn new(push_retries: u32, verify_retries: u32) -> Self {
        Self {
            push_retries,
            verify_retries,
        }
    }

    /// Publish an artifact for a branch and verify the resulting binding.
    ///
    /// # Errors
    ///
    /// `PublishError::Push` after the push retry bound is exhausted;
    /// `PublishError::Verification` when the re-read tag does not point at
    /// the pushed digest after the verify retry bound.
    pub async fn publish<R: RegistryOps>(
        &self,
        registry: &R,
        artifact: &Artifact,
        branch: &BranchName,
    ) -> Result<PublishedTag, PublishError> {
        let tag = RegistryTag::for_branch(branch);

        // Idempotence: a tag already at this digest means a previous run
        // (or a concurrent re-run at the same content) finished the push.
        if let Ok(Some(existing)) = registry.resolve_tag(&tag).await
            && existing == artifact.digest
        {
            tracing::info!(tag = %tag, digest = %artifact.digest.short(), "tag already current, skipping push");
            return Ok(PublishedTag {
                tag,
                digest: existing,
            });
        }

        self.push_with_retries(registry, artifact, &tag).await?;
        self.verify(registry, artifact, &tag).await?;

        tracing::info!(tag = %tag, digest = %artifact.digest.short(), "published");

        Ok(PublishedTag {
            tag,
            digest: artifact.digest.clone(),
        })
    }

    async fn push_with_retries<R: RegistryOps>(
        &self,
        registry: &R,
        artifact: &Artifact,
        tag: &RegistryTag,
    ) -> Result<(), PublishError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match registry.push(&artifact.digest, tag).await {
                Ok(()) => return Ok(()),
                Err(source) if attempts > self.push_retries => {
                    return Err(PublishError::Push { attempts, source });
                }
                Err(e) => {
                    tracing::warn!(tag = %tag, attempt = attempts, error = %e, "push failed, retrying");
                }
            }
        }
    }

    /// Re-resolve the tag and compare digests.
    async fn verify<R: RegistryOps>(
        &self,
        registry: &R,
        artifact: &Artifact,
        tag: &RegistryTag,
    ) -> Result<(), PublishError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let found = registry.resolve_tag(tag).await.ok().flatten();

            if found.as_ref() == Some(&artifact.digest) {
                return Ok(());
            }

            if attempts > self.verify_retries {
                return Err(PublishError::Verification {
                    expected: artifact.digest.clone(),
                    found,
                });
            }

            tracing::warn!(tag = %tag, attempt = attempts, "tag verification mismatch, re-reading");
        }
    }
}
