// ABOUTME: Production compute adapter shelling out to per-target commands.
// ABOUTME: Health goes over HTTP against the target's configured endpoint.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::{Config, TargetConfig};
use crate::exec::run_command;
use crate::types::{Digest, TargetName};

use super::{ComputeError, ComputeOps, probe_health};

/// Compute collaborator backed by per-target external commands.
///
/// `replace_command` receives SLIPWAY_TARGET, SLIPWAY_DIGEST, and
/// SLIPWAY_APP_PORT; `digest_command` receives SLIPWAY_TARGET and prints
/// the running digest (nothing when the target has no deployment yet).
pub struct CommandCompute {
    targets: HashMap<TargetName, TargetConfig>,
    app_port: u16,
}

impl CommandCompute {
    pub fn new(config: &Config) -> Self {
        let targets = config
            .branches
            .values()
            .flat_map(|mapping| mapping.targets.iter())
            .map(|target| (target.name.clone(), target.clone()))
            .collect();

        Self {
            targets,
            app_port: config.app_port,
        }
    }

    fn target(&self, name: &TargetName) -> Result<&TargetConfig, ComputeError> {
        self.targets
            .get(name)
            .ok_or_else(|| ComputeError::UnknownTarget(name.to_string()))
    }

    /// Common env for a target's adapter commands, including its
    /// configured credentials resolved at call time.
    fn base_env(&self, config: &TargetConfig) -> Result<HashMap<String, String>, ComputeError> {
        let mut env = HashMap::new();
        env.insert("SLIPWAY_TARGET".to_string(), config.name.to_string());
        env.insert("SLIPWAY_APP_PORT".to_string(), self.app_port.to_string());

        for (key, value) in &config.env {
            let resolved = value
                .resolve()
                .map_err(|e| ComputeError::MissingCredentials(e.to_string()))?;
            env.insert(key.clone(), resolved);
        }

        Ok(env)
    }
}

#[async_trait]
impl ComputeOps for CommandCompute {
    async fn replace(&self, target: &TargetName, digest: &Digest) -> Result<(), ComputeError> {
        let config = self.target(target)?;

        let mut env = self.base_env(config)?;
        env.insert("SLIPWAY_DIGEST".to_string(), digest.to_string());

        let output = run_command(&config.replace_command, &env, None)
            .await
            .map_err(|e| ComputeError::Unavailable(e.to_string()))?;

        if !output.success {
            return Err(ComputeError::Rejected(output.combined_log()));
        }

        Ok(())
    }

    async fn current_digest(&self, target: &TargetName) -> Result<Option<Digest>, ComputeError> {
        let config = self.target(target)?;
        let env = self.base_env(config)?;

        let output = run_command(&config.digest_command, &env, None)
            .await
            .map_err(|e| ComputeError::Unavailable(e.to_string()))?;

        if !output.success {
            return Err(ComputeError::Rejected(output.combined_log()));
        }

        match output.last_stdout_line() {
            None => Ok(None),
            Some(line) => Digest::parse(line)
                .map(Some)
                .map_err(|e| ComputeError::Malformed(format!("{line:?}: {e}"))),
        }
    }

    async fn health(&self, target: &TargetName) -> Result<bool, ComputeError> {
        let config = self.target(target)?;
        probe_health(&config.health_endpoint).await
    }
}
