// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Digests, revisions, branch names, registry tags, and phantom-typed IDs.

mod branch;
mod digest;
mod environment;
mod id;
mod revision;
mod tag;

pub use branch::{BranchName, BranchNameError};
pub use digest::{Digest, ParseDigestError};
pub use environment::Environment;
pub use id::{Id, RunId, TargetName};
pub use revision::{ParseRevisionError, Revision};
pub use tag::RegistryTag;
