//! Output reporters for annotation runs
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::site::Document;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Counters over one annotation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotateSummary {
    /// Documents discovered
    pub documents: usize,
    /// Documents that received a timestamp
    pub annotated: usize,
    /// Documents with no git history
    pub no_history: usize,
    /// Documents whose author email did not resolve to a profile
    pub unresolved_authors: usize,
}

impl AnnotateSummary {
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut summary = Self {
            documents: documents.len(),
            ..Default::default()
        };
        for doc in documents {
            if doc.data.contains_key("last_modified_at") {
                summary.annotated += 1;
            } else {
                summary.no_history += 1;
            }
            let status = doc
                .data
                .get("author")
                .and_then(|a| a.get("status"))
                .and_then(|s| s.as_str());
            if matches!(status, Some(s) if s != "found") {
                summary.unresolved_authors += 1;
            }
        }
        summary
    }
}

/// Full result of one annotation run.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotateReport {
    pub repo: String,
    pub generated_at: DateTime<Utc>,
    pub summary: AnnotateSummary,
    pub documents: Vec<Document>,
}

impl AnnotateReport {
    pub fn new(repo: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            repo: repo.into(),
            generated_at: Utc::now(),
            summary: AnnotateSummary::from_documents(&documents),
            documents,
        }
    }
}

/// Render a report in the specified format
pub fn render(report: &AnnotateReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    render_with_format(report, fmt)
}

/// Render a report using an OutputFormat enum
pub fn render_with_format(report: &AnnotateReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}
