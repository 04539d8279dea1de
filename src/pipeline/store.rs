// ABOUTME: Run record and build log persistence under the state directory.
// ABOUTME: One JSON file per run; logs preserved for failed-run forensics.

use std::path::{Path, PathBuf};

use crate::build::BuildLog;
use crate::error::{Error, Result};
use crate::types::RunId;

use super::run::PipelineRun;

/// Filesystem store for run records and build logs.
///
/// Layout: `<state_dir>/runs/<run-id>.json`, `<state_dir>/logs/<run-id>.log`.
#[derive(Debug, Clone)]
pub struct RunStore {
    state_dir: PathBuf,
}

impl RunStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn runs_dir(&self) -> PathBuf {
        self.state_dir.join("runs")
    }

    fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// Persist a run record, returning the path written.
    pub fn save(&self, run: &PipelineRun) -> Result<PathBuf> {
        let dir = self.runs_dir();
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", run.id));
        let json = serde_json::to_string_pretty(run)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Persist a build log, returning the path written.
    pub fn save_build_log(&self, run: &RunId, log: &BuildLog) -> Result<PathBuf> {
        let dir = self.logs_dir();
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{run}.log"));
        std::fs::write(&path, log.as_str())?;
        Ok(path)
    }

    /// Load one run record by ID.
    pub fn load(&self, id: &str) -> Result<PipelineRun> {
        let path = self.runs_dir().join(format!("{id}.json"));
        if !path.exists() {
            return Err(Error::UnknownRun(id.to_string()));
        }
        Self::read_record(&path)
    }

    /// All persisted run records, most recent first.
    pub fn list(&self) -> Result<Vec<PipelineRun>> {
        let dir = self.runs_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match Self::read_record(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable run record");
                    }
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    fn read_record(path: &Path) -> Result<PipelineRun> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
