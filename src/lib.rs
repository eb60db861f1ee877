//! Bylines - Git history and GitHub authorship for content files
//!
//! Walks the content files of a repository and annotates each one with its
//! last-modified timestamp, the GitHub profile of its original author, and a
//! list of editors ordered by how many commits each contributed. Timestamps
//! come from local git history; identities come from the GitHub commits
//! search API.

pub mod cli;
pub mod config;
pub mod contributors;
pub mod git;
pub mod github;
pub mod report;
pub mod site;
