//! JSON reporter
//!
//! Outputs the full AnnotateReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or feeding a site build.

use super::AnnotateReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AnnotateReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
