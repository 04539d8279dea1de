// ABOUTME: Deployment target configuration.
// ABOUTME: One entry per compute destination a branch can roll out to.

use super::EnvValue;
use crate::types::{Environment, TargetName};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;

/// A deployable compute destination.
///
/// `replace_command` and `digest_command` are the target's compute-layer
/// adapter: opaque commands invoked with SLIPWAY_TARGET, SLIPWAY_DIGEST
/// (replace only), and SLIPWAY_APP_PORT in their environment. Health is
/// probed over HTTP against `health_endpoint`, not through a command.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(deserialize_with = "deserialize_target_name")]
    pub name: TargetName,

    pub environment: Environment,

    /// URL polled during the health gate, e.g. `http://10.0.0.4:8000/health`.
    pub health_endpoint: String,

    /// Command that replaces the running artifact with a new digest.
    pub replace_command: NonEmpty<String>,

    /// Command that prints the digest currently running on the target
    /// (empty output if nothing is deployed yet).
    pub digest_command: NonEmpty<String>,

    /// Extra environment for the adapter commands, typically access
    /// credentials referenced from the CI environment.
    #[serde(default)]
    pub env: HashMap<String, EnvValue>,
}

fn deserialize_target_name<'de, D>(deserializer: D) -> Result<TargetName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("target name cannot be empty"));
    }
    Ok(TargetName::new(s))
}

/// The ordered target list a branch rolls out to.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchMapping {
    #[serde(deserialize_with = "deserialize_targets")]
    pub targets: NonEmpty<TargetConfig>,
}

fn deserialize_targets<'de, D>(deserializer: D) -> Result<NonEmpty<TargetConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<TargetConfig> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("a mapped branch requires at least one target"))
}
