// ABOUTME: Build output types.
// ABOUTME: An artifact is immutable once created and owned by one run.

use crate::types::{Digest, Revision};

/// Opaque build output, preserved verbatim on success and failure.
#[derive(Debug, Clone, Default)]
pub struct BuildLog(String);

impl BuildLog {
    pub fn new(contents: String) -> Self {
        Self(contents)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// A content-addressed, immutable build output ready for deployment.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub digest: Digest,
    pub source_revision: Revision,
    pub build_log: BuildLog,
}
