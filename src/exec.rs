// ABOUTME: Subprocess invocation for external collaborator commands.
// ABOUTME: Runs an argv with injected env and captures output for logs.

use nonempty::NonEmpty;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one collaborator command invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Last non-empty line of stdout. Collaborator commands report their
    /// result (a digest) there so wrappers can log freely above it.
    pub fn last_stdout_line(&self) -> Option<&str> {
        self.stdout.lines().rev().find(|line| !line.trim().is_empty())
    }

    /// Stdout and stderr stitched together for log preservation.
    pub fn combined_log(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Run an external command with the given environment variables injected.
///
/// The process inherits the parent environment (collaborator scripts need
/// PATH, HOME, CI credentials) with `env` layered on top.
pub async fn run_command(
    argv: &NonEmpty<String>,
    env: &HashMap<String, String>,
    workdir: Option<&Path>,
) -> std::io::Result<CommandOutput> {
    let mut command = Command::new(&argv.head);
    command
        .args(&argv.tail)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = workdir {
        command.current_dir(dir);
    }

    tracing::debug!(command = %argv.head, "running collaborator command");

    let output = command.output().await?;

    Ok(CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
