// ABOUTME: Build command configuration.
// ABOUTME: The build collaborator is an opaque argv invoked per revision.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for the external build command.
///
/// The command's contract: given `SLIPWAY_REVISION` in its environment,
/// produce an artifact and print its content digest as the last line of
/// stdout; exit non-zero on failure. Everything it writes is kept as the
/// build log.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub command: NonEmpty<String>,

    /// Bounded retry count for failed builds before the run is marked Failed.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Working directory for the build command; defaults to the process cwd.
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

fn default_retries() -> u32 {
    1
}
