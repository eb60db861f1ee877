//! Text (terminal) reporter with colors and formatting

use super::AnnotateReport;
use crate::site::Document;
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Render report as formatted terminal output
pub fn render(report: &AnnotateReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{BOLD}Bylines{RESET}  {DIM}{}{RESET}\n",
        report.repo
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    for doc in &report.documents {
        out.push_str(&format!("  {}\n", doc.path));

        match doc.data.get("last_modified_at").and_then(|v| v.as_str()) {
            Some(stamp) => {
                out.push_str(&format!("    {DIM}last modified{RESET} {}\n", stamp));
            }
            None => {
                out.push_str(&format!("    {YELLOW}no git history{RESET}\n"));
                continue;
            }
        }

        if let Some(line) = author_line(doc) {
            out.push_str(&line);
        }
        if let Some(line) = editors_line(doc) {
            out.push_str(&line);
        }
    }

    let s = &report.summary;
    out.push_str(&format!("\n{BOLD}SUMMARY{RESET}\n"));
    out.push_str(&format!(
        "  {} documents | {} annotated | {} without history | {} unresolved authors\n",
        s.documents, s.annotated, s.no_history, s.unresolved_authors
    ));

    Ok(out)
}

fn author_line(doc: &Document) -> Option<String> {
    let author = doc.data.get("author")?;
    let line = match author.get("status").and_then(|s| s.as_str()) {
        Some("found") => {
            let username = author
                .get("username")
                .and_then(|u| u.as_str())
                .unwrap_or("?");
            format!("    {DIM}written by{RESET} {GREEN}{}{RESET}\n", username)
        }
        Some("not_found") => format!("    {YELLOW}author not on GitHub{RESET}\n"),
        _ => format!("    {RED}author lookup failed{RESET}\n"),
    };
    Some(line)
}

fn editors_line(doc: &Document) -> Option<String> {
    let editors = doc.data.get("editors")?.as_array()?;
    if editors.is_empty() {
        return None;
    }
    let parts: Vec<String> = editors
        .iter()
        .map(|e| {
            let username = e.get("username").and_then(|u| u.as_str()).unwrap_or("?");
            let contributions = e.get("contributions").and_then(|c| c.as_u64()).unwrap_or(0);
            format!("{} ({})", username, contributions)
        })
        .collect();
    Some(format!("    {DIM}edited by{RESET} {}\n", parts.join(", ")))
}
