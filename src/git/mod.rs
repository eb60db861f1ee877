//! Git history access
//!
//! Extracts per-file commit facts (last-modified timestamps, author emails)
//! by invoking the `git` binary. No libgit2 binding: the queries this crate
//! needs (`--follow` rename tracking, strict ISO date formatting) are the
//! CLI's own, and the CLI is already a hard requirement of the environments
//! this tool runs in.

pub mod history;

pub use history::GitHistory;
