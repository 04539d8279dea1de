// ABOUTME: Secret-bearing config values with environment indirection.
// ABOUTME: Credentials are literals or {env: VAR} references resolved at use.

use crate::error::{Error, Result};
use serde::Deserialize;

/// A config value that is either inline or pulled from the environment.
///
/// Registry and compute credentials use this so the config file never has
/// to contain a secret: `password: {env: REGISTRY_PASSWORD}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve to a concrete string, reading the environment if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingEnvVar` if the referenced variable is unset
    /// and no default was configured.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        let value = EnvValue::Literal("deploy".to_string());
        assert_eq!(value.resolve().unwrap(), "deploy");
    }

    #[test]
    fn missing_var_without_default_errors() {
        let value = EnvValue::FromEnv {
            var: "SLIPWAY_TEST_UNSET_VAR".to_string(),
            default: None,
        };
        assert!(matches!(value.resolve(), Err(Error::MissingEnvVar(_))));
    }

    #[test]
    fn missing_var_falls_back_to_default() {
        let value = EnvValue::FromEnv {
            var: "SLIPWAY_TEST_UNSET_VAR".to_string(),
            default: Some("fallback".to_string()),
        };
        assert_eq!(value.resolve().unwrap(), "fallback");
    }
}
