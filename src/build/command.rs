// ABOUTME: Production build collaborator invoking the configured command.
// ABOUTME: The command prints the artifact digest as its last stdout line.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::BuildConfig;
use crate::exec::run_command;
use crate::types::{Digest, Revision};

use super::{Artifact, BuildError, BuildLog, BuildOps};

/// Runs the configured build command as a subprocess.
///
/// Contract with the command: `SLIPWAY_REVISION` names the commit to build;
/// the content digest is the last non-empty line of stdout; non-zero exit
/// means failure. Everything written to either stream is kept as the build
/// log.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    config: BuildConfig,
}

impl CommandBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BuildOps for CommandBuilder {
    async fn build(&self, revision: &Revision) -> Result<Artifact, BuildError> {
        let mut env = HashMap::new();
        env.insert("SLIPWAY_REVISION".to_string(), revision.to_string());

        tracing::info!(revision = %revision.short(), "building artifact");

        let output = run_command(&self.config.command, &env, self.config.workdir.as_deref())
            .await
            .map_err(|e| BuildError::Spawn(e.to_string()))?;

        if !output.success {
            return Err(BuildError::CommandFailed {
                code: output.exit_code,
                log: output.combined_log(),
            });
        }

        let digest_line = output
            .last_stdout_line()
            .ok_or_else(|| BuildError::MalformedDigest("build produced no output".to_string()))?;

        let digest = Digest::parse(digest_line)
            .map_err(|e| BuildError::MalformedDigest(format!("{digest_line:?}: {e}")))?;

        tracing::info!(digest = %digest.short(), "build complete");

        Ok(Artifact {
            digest,
            source_revision: revision.clone(),
            build_log: BuildLog::new(output.combined_log()),
        })
    }
}
