// ABOUTME: Content digest parsing and validation.
// ABOUTME: Digests are immutable sha256 content hashes identifying artifacts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const DIGEST_PREFIX: &str = "sha256:";
const DIGEST_HEX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum ParseDigestError {
    #[error("digest cannot be empty")]
    Empty,

    #[error("digest must start with 'sha256:': {0}")]
    MissingPrefix(String),

    #[error("digest must contain {DIGEST_HEX_LEN} hex characters, found {0}")]
    WrongLength(usize),

    #[error("invalid character in digest: '{0}'")]
    InvalidChar(char),
}

/// A content hash uniquely identifying an artifact.
///
/// Digests are immutable: two artifacts with the same digest are the same
/// bytes. Tags are mutable pointers at digests, never the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    pub fn parse(input: &str) -> Result<Self, ParseDigestError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseDigestError::Empty);
        }

        let hex = input
            .strip_prefix(DIGEST_PREFIX)
            .ok_or_else(|| ParseDigestError::MissingPrefix(input.to_string()))?;

        if hex.len() != DIGEST_HEX_LEN {
            return Err(ParseDigestError::WrongLength(hex.len()));
        }

        for c in hex.chars() {
            if !c.is_ascii_hexdigit() || c.is_ascii_uppercase() {
                return Err(ParseDigestError::InvalidChar(c));
            }
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines and summaries: `sha256:` plus 12 hex chars.
    pub fn short(&self) -> &str {
        &self.0[..DIGEST_PREFIX.len() + 12]
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex64() -> String {
        "a".repeat(64)
    }

    #[test]
    fn parses_valid_digest() {
        let input = format!("sha256:{}", hex64());
        let digest = Digest::parse(&input).unwrap();
        assert_eq!(digest.as_str(), input);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(matches!(
            Digest::parse(&hex64()),
            Err(ParseDigestError::MissingPrefix(_))
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Digest::parse("sha256:abc123"),
            Err(ParseDigestError::WrongLength(6))
        ));
    }

    #[test]
    fn rejects_uppercase_hex() {
        let input = format!("sha256:{}", "A".repeat(64));
        assert!(matches!(
            Digest::parse(&input),
            Err(ParseDigestError::InvalidChar('A'))
        ));
    }

    #[test]
    fn short_form_keeps_prefix() {
        let digest = Digest::parse(&format!("sha256:{}", hex64())).unwrap();
        assert_eq!(digest.short(), "sha256:aaaaaaaaaaaa");
    }
}
