//! Contributor aggregation
//!
//! Joins per-file git history with GitHub identity resolution:
//! - author: resolution of the earliest commit's email
//! - editors: every distinct committer email that resolved to a profile,
//!   carrying its commit count, most contributions first

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::git::GitHistory;
use crate::github::{Identity, IdentityResolver, Resolution};

/// One resolved editor with their commit count for a file.
#[derive(Debug, Clone, Serialize)]
pub struct Editor {
    #[serde(flatten)]
    pub identity: Identity,
    pub contributions: usize,
}

/// Authorship metadata for one file.
#[derive(Debug)]
pub struct ContributorSet {
    /// Resolution of the earliest commit's author email, failures included.
    pub author: Resolution,
    /// Editors sorted by contributions descending.
    pub editors: Vec<Editor>,
}

/// Builds contributor sets for paths inside one repository.
pub struct Aggregator<'a> {
    history: &'a GitHistory,
    resolver: &'a IdentityResolver,
}

impl<'a> Aggregator<'a> {
    pub fn new(history: &'a GitHistory, resolver: &'a IdentityResolver) -> Self {
        Self { history, resolver }
    }

    /// Gather author and editor metadata for one repo-relative path.
    ///
    /// Returns `None` when the path has no commit history; no lookups happen
    /// in that case. Editor emails that resolve to `NotFound` or `Failed`
    /// are dropped from the editors list (neither carries a usable profile),
    /// while the author field keeps its resolution outcome as-is. Each email
    /// is resolved independently, so one failed lookup never discards the
    /// rest.
    pub fn aggregate(&self, path: &str) -> Option<ContributorSet> {
        let author_email = self.history.first_author_email(path)?;
        let author = self.resolver.resolve(&author_email);

        // Count per distinct email. The stream is newest-first and the map
        // keeps insertion order, which settles ties after the sort below.
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for email in self.history.commit_emails(path) {
            *counts.entry(email).or_insert(0) += 1;
        }

        let mut editors = Vec::new();
        for (email, contributions) in counts {
            match self.resolver.resolve(&email) {
                Resolution::Found(identity) => editors.push(Editor {
                    identity,
                    contributions,
                }),
                Resolution::NotFound => {
                    debug!("no GitHub profile for {}, dropped from editors", email);
                }
                Resolution::Failed(e) => {
                    debug!("lookup failed for {} ({}), dropped from editors", email, e);
                }
            }
        }

        // Stable sort: equal counts keep first-appearance order.
        editors.sort_by(|a, b| b.contributions.cmp(&a.contributions));

        Some(ContributorSet { author, editors })
    }
}
