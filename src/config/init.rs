// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates slipway.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;

    Ok(())
}

fn template_yaml() -> &'static str {
    r#"registry:
  url: registry.example.com/my-app
  username: deploy
  # Secrets stay out of this file; reference the CI environment instead.
  password: {env: SLIPWAY_REGISTRY_PASSWORD}
  push_command: ["./scripts/registry-push.sh"]
  resolve_command: ["./scripts/registry-resolve.sh"]

build:
  # Prints the artifact digest (sha256:...) as the last line of stdout.
  command: ["./scripts/build-image.sh"]
  retries: 1

# Passed through unchanged to the deployed application.
app_port: 8000

health:
  timeout: 60s
  initial_interval: 1s
  max_interval: 8s
  max_attempts: 10

branches:
  development:
    targets:
      - name: dev-target
        environment: development
        health_endpoint: http://dev.internal:8000/health
        replace_command: ["./scripts/replace.sh", "dev-target"]
        digest_command: ["./scripts/current-digest.sh", "dev-target"]
  master:
    targets:
      - name: prod-target
        environment: production
        health_endpoint: http://prod.internal:8000/health
        replace_command: ["./scripts/replace.sh", "prod-target"]
        digest_command: ["./scripts/current-digest.sh", "prod-target"]
"#
}
