// ABOUTME: Production registry adapter shelling out to configured commands.
// ABOUTME: Push and resolve are opaque argvs with env-injected parameters.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::RegistryConfig;
use crate::exec::run_command;
use crate::types::{Digest, RegistryTag};

use super::{RegistryError, RegistryOps};

/// Registry collaborator backed by external commands.
///
/// `push_command` receives SLIPWAY_REGISTRY, SLIPWAY_TAG, SLIPWAY_DIGEST
/// and credentials; `resolve_command` receives SLIPWAY_REGISTRY and
/// SLIPWAY_TAG and prints the digest the tag points at (nothing if the tag
/// does not exist).
pub struct CommandRegistry {
    config: RegistryConfig,
    credentials: HashMap<String, String>,
}

impl CommandRegistry {
    /// Build the adapter, resolving credential env references once.
    pub fn new(config: RegistryConfig) -> crate::error::Result<Self> {
        let mut credentials = HashMap::new();
        if let Some(username) = &config.username {
            credentials.insert("SLIPWAY_REGISTRY_USERNAME".to_string(), username.resolve()?);
        }
        if let Some(password) = &config.password {
            credentials.insert("SLIPWAY_REGISTRY_PASSWORD".to_string(), password.resolve()?);
        }
        Ok(Self {
            config,
            credentials,
        })
    }

    fn base_env(&self, tag: &RegistryTag) -> HashMap<String, String> {
        let mut env = self.credentials.clone();
        env.insert("SLIPWAY_REGISTRY".to_string(), self.config.url.clone());
        env.insert("SLIPWAY_TAG".to_string(), tag.to_string());
        env
    }
}

#[async_trait]
impl RegistryOps for CommandRegistry {
    async fn push(&self, digest: &Digest, tag: &RegistryTag) -> Result<(), RegistryError> {
        let mut env = self.base_env(tag);
        env.insert("SLIPWAY_DIGEST".to_string(), digest.to_string());

        let output = run_command(&self.config.push_command, &env, None)
            .await
            .map_err(|e| RegistryError::Unreachable(e.to_string()))?;

        if !output.success {
            return Err(RegistryError::Rejected(output.combined_log()));
        }

        Ok(())
    }

    async fn resolve_tag(&self, tag: &RegistryTag) -> Result<Option<Digest>, RegistryError> {
        let env = self.base_env(tag);

        let output = run_command(&self.config.resolve_command, &env, None)
            .await
            .map_err(|e| RegistryError::Unreachable(e.to_string()))?;

        if !output.success {
            return Err(RegistryError::Rejected(output.combined_log()));
        }

        match output.last_stdout_line() {
            None => Ok(None),
            Some(line) => Digest::parse(line)
                .map(Some)
                .map_err(|e| RegistryError::Malformed(format!("{line:?}: {e}"))),
        }
    }
}
