// ABOUTME: Configuration types and parsing for slipway.yml.
// ABOUTME: Handles YAML parsing, env var indirection, and branch mapping.

mod build;
mod env_value;
mod health;
mod init;
mod registry;
mod target;

pub use build::BuildConfig;
pub use env_value::EnvValue;
pub use health::HealthConfig;
pub use init::init_config;
pub use registry::RegistryConfig;
pub use target::{BranchMapping, TargetConfig};

use crate::error::{Error, Result};
use crate::types::BranchName;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "slipway.yml";
pub const CONFIG_FILENAME_ALT: &str = "slipway.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".slipway/config.yml";

/// Process-wide configuration, read once at startup and passed explicitly
/// into the orchestrator. Never ambient: two orchestrators in one process
/// can run with independent configs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,

    pub build: BuildConfig,

    /// Port the deployed application listens on, passed through unchanged
    /// to the compute layer's runtime configuration.
    #[serde(default = "default_app_port")]
    pub app_port: u16,

    #[serde(default)]
    pub health: HealthConfig,

    /// Branch name to deployment targets. Branches absent from this map
    /// resolve to no targets and short-circuit the pipeline.
    #[serde(default)]
    pub branches: HashMap<BranchName, BranchMapping>,

    /// Where run records and build logs are written.
    /// Defaults to `$HOME/.local/state/slipway` when unset.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

fn default_app_port() -> u16 {
    8000
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// The state directory, with the default applied.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local/state/slipway")
        })
    }
}
