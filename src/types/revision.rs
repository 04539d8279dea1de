// ABOUTME: Commit revision validation.
// ABOUTME: Accepts abbreviated or full git-style hex commit hashes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MIN_LEN: usize = 7;
const MAX_LEN: usize = 40;

#[derive(Debug, Error)]
pub enum ParseRevisionError {
    #[error("revision cannot be empty")]
    Empty,

    #[error("revision must be {MIN_LEN}-{MAX_LEN} characters, found {0}")]
    WrongLength(usize),

    #[error("invalid character in revision: '{0}'")]
    InvalidChar(char),
}

/// A commit hash identifying the source tree a pipeline run builds from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn parse(input: &str) -> Result<Self, ParseRevisionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseRevisionError::Empty);
        }

        if input.len() < MIN_LEN || input.len() > MAX_LEN {
            return Err(ParseRevisionError::WrongLength(input.len()));
        }

        for c in input.chars() {
            if !c.is_ascii_hexdigit() || c.is_ascii_uppercase() {
                return Err(ParseRevisionError::InvalidChar(c));
            }
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for run IDs and log lines.
    pub fn short(&self) -> &str {
        &self.0[..MIN_LEN]
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Revision::parse(&s).map_err(serde::de::Error::custom)
    }
}
