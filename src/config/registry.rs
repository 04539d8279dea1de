// ABOUTME: Artifact registry configuration.
// ABOUTME: Locator, credentials via env indirection, and adapter commands.

use super::EnvValue;
use nonempty::NonEmpty;
use serde::Deserialize;

/// Configuration for the artifact registry the publisher pushes to.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Registry target locator, e.g. `registry.example.com/my-app`.
    pub url: String,

    #[serde(default)]
    pub username: Option<EnvValue>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    /// Command that pushes a digest under a tag.
    /// Env: SLIPWAY_REGISTRY, SLIPWAY_TAG, SLIPWAY_DIGEST, credentials.
    pub push_command: NonEmpty<String>,

    /// Command that prints the digest a tag currently points at (empty
    /// output if the tag does not exist).
    pub resolve_command: NonEmpty<String>,

    /// Retries for failed pushes before the run is marked Failed.
    #[serde(default = "default_push_retries")]
    pub push_retries: u32,

    /// Retries for post-push verification before the mismatch is fatal.
    #[serde(default = "default_verify_retries")]
    pub verify_retries: u32,
}

fn default_push_retries() -> u32 {
    2
}

fn default_verify_retries() -> u32 {
    1
}
