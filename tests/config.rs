// ABOUTME: Tests for configuration parsing and discovery.
// ABOUTME: YAML shape, defaults, env indirection, and mapping validation.

use slipway::config::{Config, EnvValue};
use slipway::error::Error;
use slipway::types::Environment;
use std::fs;
use std::time::Duration;

fn full_yaml() -> &'static str {
    r#"
registry:
  url: registry.example.com/my-app
  username: deploy
  password: {env: TEST_REGISTRY_PASSWORD}
  push_command: ["./scripts/push.sh"]
  resolve_command: ["./scripts/resolve.sh"]

build:
  command: ["./scripts/build.sh", "--image"]
  retries: 2

app_port: 9000

health:
  timeout: 30s
  initial_interval: 500ms
  max_attempts: 5

branches:
  development:
    targets:
      - name: dev-target
        environment: development
        health_endpoint: http://dev.internal:9000/health
        replace_command: ["./scripts/replace.sh"]
        digest_command: ["./scripts/digest.sh"]
  master:
    targets:
      - name: prod-a
        environment: production
        health_endpoint: http://prod-a.internal:9000/health
        replace_command: ["./scripts/replace.sh"]
        digest_command: ["./scripts/digest.sh"]
      - name: prod-b
        environment: production
        health_endpoint: http://prod-b.internal:9000/health
        replace_command: ["./scripts/replace.sh"]
        digest_command: ["./scripts/digest.sh"]
"#
}

#[test]
fn parses_full_config() {
    let config = Config::from_yaml(full_yaml()).unwrap();

    assert_eq!(config.registry.url, "registry.example.com/my-app");
    assert_eq!(
        config.registry.username,
        Some(EnvValue::Literal("deploy".to_string()))
    );
    assert_eq!(config.build.command.first(), "./scripts/build.sh");
    assert_eq!(config.build.retries, 2);
    assert_eq!(config.app_port, 9000);
    assert_eq!(config.health.timeout, Duration::from_secs(30));
    assert_eq!(config.health.initial_interval, Duration::from_millis(500));
    assert_eq!(config.health.max_attempts, 5);
    assert_eq!(config.branches.len(), 2);

    let master = config
        .branches
        .get(&slipway::types::BranchName::new("master").unwrap())
        .unwrap();
    assert_eq!(master.targets.len(), 2);
    assert_eq!(master.targets.first().environment, Environment::Production);
}

#[test]
fn defaults_apply_when_sections_omitted() {
    let yaml = r#"
registry:
  url: registry.example.com/app
  push_command: ["push"]
  resolve_command: ["resolve"]
build:
  command: ["build"]
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.app_port, 8000);
    assert_eq!(config.build.retries, 1);
    assert_eq!(config.registry.push_retries, 2);
    assert_eq!(config.registry.verify_retries, 1);
    assert_eq!(config.health.timeout, Duration::from_secs(60));
    assert_eq!(config.health.max_attempts, 10);
    assert!(config.branches.is_empty());
}

#[test]
fn rejects_branch_with_empty_target_list() {
    let yaml = r#"
registry:
  url: registry.example.com/app
  push_command: ["push"]
  resolve_command: ["resolve"]
build:
  command: ["build"]
branches:
  development:
    targets: []
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("at least one target"));
}

#[test]
fn rejects_empty_build_command() {
    let yaml = r#"
registry:
  url: registry.example.com/app
  push_command: ["push"]
  resolve_command: ["resolve"]
build:
  command: []
"#;
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn env_value_resolves_from_environment() {
    let config = Config::from_yaml(full_yaml()).unwrap();
    let password = config.registry.password.clone().unwrap();

    temp_env::with_var("TEST_REGISTRY_PASSWORD", Some("hunter2"), || {
        assert_eq!(password.resolve().unwrap(), "hunter2");
    });

    temp_env::with_var_unset("TEST_REGISTRY_PASSWORD", || {
        assert!(matches!(
            password.resolve(),
            Err(Error::MissingEnvVar(var)) if var == "TEST_REGISTRY_PASSWORD"
        ));
    });
}

#[test]
fn discovers_config_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("slipway.yml"), full_yaml()).unwrap();

    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config.app_port, 9000);
}

#[test]
fn discovers_dotdir_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".slipway")).unwrap();
    fs::write(dir.path().join(".slipway/config.yml"), full_yaml()).unwrap();

    assert!(Config::discover(dir.path()).is_ok());
}

#[test]
fn discover_fails_without_config() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::discover(dir.path()),
        Err(Error::ConfigNotFound(_))
    ));
}

#[test]
fn state_dir_override_wins() {
    let yaml = r#"
registry:
  url: registry.example.com/app
  push_command: ["push"]
  resolve_command: ["resolve"]
build:
  command: ["build"]
state_dir: /var/lib/slipway
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(
        config.state_dir(),
        std::path::PathBuf::from("/var/lib/slipway")
    );
}
