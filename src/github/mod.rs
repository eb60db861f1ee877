//! GitHub identity lookup
//!
//! Resolves committer emails to GitHub profiles through the commit-search
//! API. One synchronous request per lookup, no retries, no caching: callers
//! get a [`Resolution`] that is either a profile, a clean miss, or a typed
//! failure they can branch on.

mod resolver;

pub use resolver::{Identity, IdentityResolver, Resolution, DEFAULT_API_URL};

use thiserror::Error;

/// Why a single identity lookup produced no usable profile.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("GitHub API returned status {0}")]
    Status(u16),

    #[error("failed to parse search response: {0}")]
    Parse(String),
}
