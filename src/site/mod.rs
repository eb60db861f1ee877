//! Site content discovery and annotation
//!
//! `Document` is the host contract: a repo-relative path plus a mutable
//! key-value metadata bag. The annotator copies git and contributor facts
//! into that bag and owns the warning-level logging; the layers below it
//! only report structured results.

use ignore::WalkBuilder;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

use crate::contributors::Aggregator;
use crate::git::GitHistory;
use crate::github::Resolution;

/// Extensions treated as content when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown", "html"];

/// One content file and its metadata bag.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Repo-relative path with forward slashes.
    pub path: String,
    /// Annotation target; rendered as-is in reports.
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: Map::new(),
        }
    }
}

/// Walk the tree under `repo_root` (or `content_dir` inside it) and collect
/// content documents, gitignore rules respected, sorted by path.
pub fn discover_documents(
    repo_root: &Path,
    content_dir: Option<&str>,
    extensions: &[String],
) -> Vec<Document> {
    let walk_root = match content_dir {
        Some(dir) => repo_root.join(dir),
        None => repo_root.to_path_buf(),
    };

    let walker = WalkBuilder::new(&walk_root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .build();

    let mut documents = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|wanted| wanted == ext))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        // git log wants repo-relative paths, forward slashes on every OS
        if let Ok(relative) = path.strip_prefix(repo_root) {
            let rel = relative.to_string_lossy().replace('\\', "/");
            documents.push(Document::new(rel));
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("discovered {} documents", documents.len());
    documents
}

/// Copies git facts into document metadata bags.
///
/// Without an aggregator only the timestamp is written (offline mode).
pub struct Annotator<'a> {
    history: &'a GitHistory,
    aggregator: Option<&'a Aggregator<'a>>,
}

impl<'a> Annotator<'a> {
    pub fn new(history: &'a GitHistory, aggregator: Option<&'a Aggregator<'a>>) -> Self {
        Self {
            history,
            aggregator,
        }
    }

    /// Annotate one document in place.
    ///
    /// Fields written: `last_modified_at` (ISO-8601 author date of the
    /// newest commit), `author` (tagged resolution), `editors`, and
    /// `author_username` when the author resolved. A document without git
    /// history is left untouched apart from a warning.
    pub fn annotate(&self, doc: &mut Document) {
        match self.history.last_modified(&doc.path) {
            Some(stamp) => {
                doc.data
                    .insert("last_modified_at".to_string(), Value::String(stamp));
            }
            None => warn!("no git history for {}", doc.path),
        }

        let Some(aggregator) = self.aggregator else {
            return;
        };

        match aggregator.aggregate(&doc.path) {
            Some(set) => {
                if let Resolution::Found(identity) = &set.author {
                    doc.data.insert(
                        "author_username".to_string(),
                        Value::String(identity.username.clone()),
                    );
                }
                doc.data
                    .insert("author".to_string(), author_value(&set.author));
                doc.data
                    .insert("editors".to_string(), serde_json::json!(set.editors));
            }
            None => warn!("no git history for {}", doc.path),
        }
    }
}

/// Host-facing form of an author resolution.
fn author_value(resolution: &Resolution) -> Value {
    match resolution {
        Resolution::Found(identity) => serde_json::json!({
            "status": "found",
            "username": identity.username,
            "avatar_url": identity.avatar_url,
            "profile_url": identity.profile_url,
            "id": identity.id,
        }),
        Resolution::NotFound => serde_json::json!({ "status": "not_found" }),
        Resolution::Failed(e) => serde_json::json!({
            "status": "lookup_failed",
            "reason": e.to_string(),
        }),
    }
}
