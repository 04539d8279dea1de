// ABOUTME: Test support utilities.
// ABOUTME: In-memory collaborator fakes and config builders for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use nonempty::NonEmpty;
use slipway::build::{Artifact, BuildError, BuildLog, BuildOps};
use slipway::compute::{ComputeError, ComputeOps};
use slipway::config::{
    BranchMapping, BuildConfig, Config, EnvValue, HealthConfig, RegistryConfig, TargetConfig,
};
use slipway::registry::{RegistryError, RegistryOps};
use slipway::types::{BranchName, Digest, Environment, RegistryTag, Revision, TargetName};

// Each test binary only uses some of these helpers, so allow dead_code.

// =============================================================================
// Value constructors
// =============================================================================

#[allow(dead_code)]
pub fn digest(fill: char) -> Digest {
    Digest::parse(&format!("sha256:{}", fill.to_string().repeat(64))).unwrap()
}

#[allow(dead_code)]
pub fn branch(name: &str) -> BranchName {
    BranchName::new(name).unwrap()
}

#[allow(dead_code)]
pub fn revision(hash: &str) -> Revision {
    Revision::parse(hash).unwrap()
}

#[allow(dead_code)]
pub fn target(name: &str, environment: Environment) -> TargetConfig {
    TargetConfig {
        name: TargetName::new(name),
        environment,
        health_endpoint: format!("http://{name}.internal:8000/health"),
        replace_command: NonEmpty::new("true".to_string()),
        digest_command: NonEmpty::new("true".to_string()),
        env: HashMap::new(),
    }
}

/// Config with the canonical two-branch mapping and a fast health gate.
#[allow(dead_code)]
pub fn test_config() -> Config {
    let mut branches = HashMap::new();
    branches.insert(
        branch("development"),
        BranchMapping {
            targets: NonEmpty::new(target("dev-target", Environment::Development)),
        },
    );
    branches.insert(
        branch("master"),
        BranchMapping {
            targets: NonEmpty::new(target("prod-target", Environment::Production)),
        },
    );

    config_with_branches(branches)
}

#[allow(dead_code)]
pub fn config_with_branches(branches: HashMap<BranchName, BranchMapping>) -> Config {
    Config {
        registry: RegistryConfig {
            url: "registry.test/app".to_string(),
            username: Some(EnvValue::Literal("deploy".to_string())),
            password: None,
            push_command: NonEmpty::new("true".to_string()),
            resolve_command: NonEmpty::new("true".to_string()),
            push_retries: 2,
            verify_retries: 1,
        },
        build: BuildConfig {
            command: NonEmpty::new("true".to_string()),
            retries: 1,
            workdir: None,
        },
        app_port: 8000,
        health: fast_health(),
        branches,
        state_dir: None,
    }
}

/// Health bounds small enough to keep failing-gate tests fast.
#[allow(dead_code)]
pub fn fast_health() -> HealthConfig {
    HealthConfig {
        timeout: Duration::from_millis(250),
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(4),
        max_attempts: 3,
    }
}

// =============================================================================
// FakeBuilder
// =============================================================================

#[derive(Default)]
struct BuilderInner {
    digests: Mutex<HashMap<String, Digest>>,
    failures_remaining: AtomicU32,
    builds: AtomicU32,
    delay: Mutex<Option<Duration>>,
}

/// Programmable build collaborator. Cloning shares state, so tests keep a
/// handle while the orchestrator owns another.
#[derive(Clone, Default)]
pub struct FakeBuilder {
    inner: Arc<BuilderInner>,
}

impl FakeBuilder {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a revision to the digest its build produces.
    #[allow(dead_code)]
    pub fn produces(self, revision: &str, digest: Digest) -> Self {
        self.inner
            .digests
            .lock()
            .insert(revision.to_string(), digest);
        self
    }

    /// Fail the next `n` builds before succeeding.
    #[allow(dead_code)]
    pub fn fail_times(self, n: u32) -> Self {
        self.inner.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Make each build take this long; used to hold a run in flight.
    #[allow(dead_code)]
    pub fn build_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock() = Some(delay);
        self
    }

    #[allow(dead_code)]
    pub fn builds(&self) -> u32 {
        self.inner.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildOps for FakeBuilder {
    async fn build(&self, revision: &Revision) -> Result<Artifact, BuildError> {
        self.inner.builds.fetch_add(1, Ordering::SeqCst);

        let delay = *self.inner.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.inner.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.inner
                .failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(BuildError::CommandFailed {
                code: Some(1),
                log: "synthetic build failure".to_string(),
            });
        }

        let digest = self
            .inner
            .digests
            .lock()
            .get(revision.as_str())
            .cloned()
            .ok_or_else(|| BuildError::MalformedDigest(format!("no digest for {revision}")))?;

        Ok(Artifact {
            digest,
            source_revision: revision.clone(),
            build_log: BuildLog::new("fake build output".to_string()),
        })
    }
}

// =============================================================================
// FakeRegistry
// =============================================================================

#[derive(Default)]
struct RegistryInner {
    tags: Mutex<HashMap<String, Digest>>,
    pushes: AtomicU32,
    push_failures_remaining: AtomicU32,
    corrupt_resolve: Mutex<Option<Digest>>,
}

/// In-memory artifact registry. Tags are mutable pointers at digests.
#[derive(Clone, Default)]
pub struct FakeRegistry {
    inner: Arc<RegistryInner>,
}

impl FakeRegistry {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-set a tag, as if a previous run already published it.
    #[allow(dead_code)]
    pub fn with_tag(self, tag: &RegistryTag, digest: Digest) -> Self {
        self.inner.tags.lock().insert(tag.to_string(), digest);
        self
    }

    /// Fail the next `n` pushes.
    #[allow(dead_code)]
    pub fn fail_pushes(self, n: u32) -> Self {
        self.inner
            .push_failures_remaining
            .store(n, Ordering::SeqCst);
        self
    }

    /// Make every resolve report this digest regardless of pushes,
    /// simulating a registry that loses or misroutes tag writes.
    #[allow(dead_code)]
    pub fn corrupt_resolve(self, digest: Digest) -> Self {
        *self.inner.corrupt_resolve.lock() = Some(digest);
        self
    }

    #[allow(dead_code)]
    pub fn pushes(&self) -> u32 {
        self.inner.pushes.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn tag_digest(&self, tag: &RegistryTag) -> Option<Digest> {
        self.inner.tags.lock().get(tag.as_str()).cloned()
    }
}

#[async_trait]
impl RegistryOps for FakeRegistry {
    async fn push(&self, digest: &Digest, tag: &RegistryTag) -> Result<(), RegistryError> {
        self.inner.pushes.fetch_add(1, Ordering::SeqCst);

        let remaining = self.inner.push_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.inner
                .push_failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(RegistryError::Unreachable("synthetic push failure".to_string()));
        }

        self.inner
            .tags
            .lock()
            .insert(tag.to_string(), digest.clone());
        Ok(())
    }

    async fn resolve_tag(&self, tag: &RegistryTag) -> Result<Option<Digest>, RegistryError> {
        if let Some(corrupt) = self.inner.corrupt_resolve.lock().clone() {
            return Ok(Some(corrupt));
        }
        Ok(self.inner.tags.lock().get(tag.as_str()).cloned())
    }
}

// =============================================================================
// FakeCompute
// =============================================================================

/// Scripted health behavior per target.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum HealthScript {
    /// Healthy on the first poll.
    Healthy,
    /// Never reports healthy.
    Never,
    /// Healthy once `n` polls have failed.
    AfterPolls(u32),
}

#[derive(Default)]
struct ComputeInner {
    current: Mutex<HashMap<String, Digest>>,
    health: Mutex<HashMap<String, (HealthScript, u32)>>,
    replaces: Mutex<Vec<(String, Digest)>>,
    failing_digests: Mutex<Vec<Digest>>,
}

/// In-memory compute layer. `current` tracks the digest each target runs;
/// replaces mutate it immediately (health-gating is the coordinator's
/// job, not the platform's).
#[derive(Clone, Default)]
pub struct FakeCompute {
    inner: Arc<ComputeInner>,
}

impl FakeCompute {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-set the digest a target is running.
    #[allow(dead_code)]
    pub fn running(self, target: &str, digest: Digest) -> Self {
        self.inner
            .current
            .lock()
            .insert(target.to_string(), digest);
        self
    }

    /// Script a target's health behavior (default: healthy immediately).
    #[allow(dead_code)]
    pub fn health_script(self, target: &str, script: HealthScript) -> Self {
        self.inner
            .health
            .lock()
            .insert(target.to_string(), (script, 0));
        self
    }

    /// Make replaces of a specific digest fail; used to break rollbacks.
    #[allow(dead_code)]
    pub fn fail_replaces_of(self, digest: Digest) -> Self {
        self.inner.failing_digests.lock().push(digest);
        self
    }

    /// Every `replace` issued, in order.
    #[allow(dead_code)]
    pub fn replaces(&self) -> Vec<(String, Digest)> {
        self.inner.replaces.lock().clone()
    }

    #[allow(dead_code)]
    pub fn replace_count(&self) -> usize {
        self.inner.replaces.lock().len()
    }

    /// The digest a target is currently running.
    #[allow(dead_code)]
    pub fn running_digest(&self, target: &str) -> Option<Digest> {
        self.inner.current.lock().get(target).cloned()
    }
}

#[async_trait]
impl ComputeOps for FakeCompute {
    async fn replace(&self, target: &TargetName, digest: &Digest) -> Result<(), ComputeError> {
        if self.inner.failing_digests.lock().contains(digest) {
            return Err(ComputeError::Rejected(format!(
                "synthetic replace failure for {digest}"
            )));
        }

        self.inner
            .replaces
            .lock()
            .push((target.to_string(), digest.clone()));
        self.inner
            .current
            .lock()
            .insert(target.to_string(), digest.clone());
        Ok(())
    }

    async fn current_digest(&self, target: &TargetName) -> Result<Option<Digest>, ComputeError> {
        Ok(self.inner.current.lock().get(target.as_str()).cloned())
    }

    async fn health(&self, target: &TargetName) -> Result<bool, ComputeError> {
        let mut table = self.inner.health.lock();
        let entry = table
            .entry(target.as_str().to_string())
            .or_insert((HealthScript::Healthy, 0));

        let healthy = match entry.0 {
            HealthScript::Healthy => true,
            HealthScript::Never => false,
            HealthScript::AfterPolls(n) => entry.1 >= n,
        };
        entry.1 += 1;
        Ok(healthy)
    }
}
