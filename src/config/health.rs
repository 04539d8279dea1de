// ABOUTME: Health gate configuration for rollouts.
// ABOUTME: Bounds the polling loop by budget, attempts, and backoff interval.

use serde::Deserialize;
use std::time::Duration;

/// Bounds for the post-replace health gate.
///
/// Polling backs off exponentially from `initial_interval`, doubling up to
/// `max_interval`, and stops when the target reports healthy, `max_attempts`
/// polls have failed, or the `timeout` budget is spent.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_initial_interval", with = "humantime_serde")]
    pub initial_interval: Duration,

    #[serde(default = "default_max_interval", with = "humantime_serde")]
    pub max_interval: Duration,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            initial_interval: default_initial_interval(),
            max_interval: default_max_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_initial_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_interval() -> Duration {
    Duration::from_secs(8)
}

fn default_max_attempts() -> u32 {
    10
}
