// ABOUTME: Registry tag derivation from branch names.
// ABOUTME: Pure, deterministic mapping so publish is idempotent per branch.

use super::BranchName;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A mutable named pointer to a digest in the artifact registry.
///
/// Tags are derived from branch names by a pure function: the same branch
/// always yields the same tag, so repeated publishes for a branch move one
/// pointer instead of accumulating tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryTag(String);

impl RegistryTag {
    /// Derive the registry tag for a branch.
    ///
    /// Branch names may contain `/` and `.` which registry tags cannot;
    /// those fold to `-`, runs of `-` collapse, and the result is
    /// lowercased. `BranchName` validation guarantees the result is
    /// non-empty.
    pub fn for_branch(branch: &BranchName) -> Self {
        let mut tag = String::with_capacity(branch.as_str().len());
        let mut last_dash = false;

        for c in branch.as_str().chars() {
            let mapped = match c {
                'a'..='z' | '0'..='9' | '_' => {
                    last_dash = false;
                    c
                }
                'A'..='Z' => {
                    last_dash = false;
                    c.to_ascii_lowercase()
                }
                _ => {
                    if last_dash {
                        continue;
                    }
                    last_dash = true;
                    '-'
                }
            };
            tag.push(mapped);
        }

        // Registry tags cannot begin or end with a separator.
        let trimmed = tag.trim_matches('-');
        if trimmed.is_empty() {
            // A branch made entirely of separators still needs a total
            // derivation; "untagged" is deterministic and valid.
            return Self("untagged".to_string());
        }
        Self(trimmed.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RegistryTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RegistryTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s))
    }
}
