// ABOUTME: Git branch name validation.
// ABOUTME: Enforces the ref-name subset slipway accepts as pipeline triggers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum BranchNameError {
    #[error("branch name cannot be empty")]
    Empty,

    #[error("branch name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("branch name cannot start or end with '/'")]
    EdgeSlash,

    #[error("branch name cannot contain '..'")]
    DoubleDot,

    #[error("invalid character in branch name: '{0}'")]
    InvalidChar(char),
}

/// A validated branch name from a commit event.
///
/// Branch names drive both target resolution and registry tag derivation,
/// so the accepted charset is the intersection of what git refs and
/// registry tags can express once slashes are folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(value: &str) -> Result<Self, BranchNameError> {
        if value.is_empty() {
            return Err(BranchNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(BranchNameError::TooLong);
        }

        if value.starts_with('/') || value.ends_with('/') {
            return Err(BranchNameError::EdgeSlash);
        }

        if value.contains("..") {
            return Err(BranchNameError::DoubleDot);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '/' && c != '.' && c != '-' && c != '_' {
                return Err(BranchNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BranchName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BranchName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BranchName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_slashed_names() {
        assert!(BranchName::new("master").is_ok());
        assert!(BranchName::new("development").is_ok());
        assert!(BranchName::new("feature/login-form").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(BranchName::new(""), Err(BranchNameError::Empty)));
    }

    #[test]
    fn rejects_edge_slash() {
        assert!(matches!(
            BranchName::new("/feature"),
            Err(BranchNameError::EdgeSlash)
        ));
        assert!(matches!(
            BranchName::new("feature/"),
            Err(BranchNameError::EdgeSlash)
        ));
    }

    #[test]
    fn rejects_double_dot() {
        assert!(matches!(
            BranchName::new("a..b"),
            Err(BranchNameError::DoubleDot)
        ));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(matches!(
            BranchName::new("my branch"),
            Err(BranchNameError::InvalidChar(' '))
        ));
    }
}
