//! Annotate command: discover content files and stamp each one with git
//! history and GitHub authorship metadata.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use crate::config::{load_config, BylinesConfig};
use crate::contributors::Aggregator;
use crate::git::GitHistory;
use crate::github::{IdentityResolver, DEFAULT_API_URL};
use crate::report::{self, AnnotateReport};
use crate::site::{self, Annotator, DEFAULT_EXTENSIONS};

/// Effective settings after merging CLI flags with bylines.toml defaults
struct RunConfig {
    format: String,
    content_dir: Option<String>,
    extensions: Vec<String>,
    api_url: String,
    workers: usize,
}

/// Apply CLI defaults from project config
fn apply_config_defaults(
    format: String,
    content: Option<String>,
    ext: Vec<String>,
    api_url: Option<String>,
    workers: usize,
    config: &BylinesConfig,
) -> RunConfig {
    RunConfig {
        format: if format == "text" {
            config.defaults.format.clone().unwrap_or(format)
        } else {
            format
        },
        content_dir: content.or_else(|| config.content.dir.clone()),
        extensions: if ext.is_empty() {
            config
                .content
                .extensions
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
        } else {
            ext
        },
        api_url: api_url
            .or_else(|| config.github.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        workers: if workers == 8 {
            config.defaults.workers.unwrap_or(workers)
        } else {
            workers
        },
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    path: &Path,
    format: &str,
    output: Option<&Path>,
    content: Option<String>,
    ext: Vec<String>,
    offline: bool,
    api_url: Option<String>,
    workers: usize,
) -> Result<()> {
    let start_time = Instant::now();

    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Repository path does not exist: {}", path.display()))?;
    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }
    if !GitHistory::is_git_repo(&repo_path) {
        anyhow::bail!(
            "Not a git repository: {}\nBylines reads commit history, so run it inside a git work tree.",
            repo_path.display()
        );
    }

    let config = load_config(&repo_path);
    let run_config =
        apply_config_defaults(format.to_string(), content, ext, api_url, workers, &config);
    let quiet_mode = run_config.format == "json";

    print_header(&repo_path, &run_config.format);

    let mut documents = site::discover_documents(
        &repo_path,
        run_config.content_dir.as_deref(),
        &run_config.extensions,
    );
    if documents.is_empty() && !quiet_mode {
        println!(
            "{}No content files found (extensions: {})",
            style("○ ").dim(),
            run_config.extensions.join(", ")
        );
    }

    let history = GitHistory::new(&repo_path);
    let resolver = if offline {
        None
    } else {
        Some(IdentityResolver::from_env(&run_config.api_url))
    };
    let aggregator = resolver.as_ref().map(|r| Aggregator::new(&history, r));
    let annotator = Annotator::new(&history, aggregator.as_ref());

    let pb = if quiet_mode {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(documents.len() as u64)
    };
    pb.set_style(create_bar_style());
    pb.set_message("annotating");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(run_config.workers)
        .build()?;
    pool.install(|| {
        documents.par_iter_mut().for_each(|doc| {
            annotator.annotate(doc);
            pb.inc(1);
        });
    });
    pb.finish_and_clear();

    let repo_name = repo_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_path.display().to_string());
    let annotate_report = AnnotateReport::new(repo_name, documents);

    format_and_output(&annotate_report, &run_config.format, output)?;
    print_final_summary(quiet_mode, start_time);

    Ok(())
}

/// Format and output the report
fn format_and_output(
    annotate_report: &AnnotateReport,
    format: &str,
    output_path: Option<&Path>,
) -> Result<()> {
    let output = report::render(annotate_report, format)?;

    if let Some(out_path) = output_path {
        std::fs::write(out_path, &output)
            .with_context(|| format!("Failed to write report to {}", out_path.display()))?;
        // Use stderr for the notice to keep stdout clean for machine formats
        eprintln!(
            "\n{}Report written to: {}",
            style("📄 ").bold(),
            style(out_path.display()).cyan()
        );
    } else {
        // Machine-readable formats skip the leading newline to keep stdout clean
        if format != "json" {
            println!();
        }
        println!("{}", output);
    }

    Ok(())
}

/// Print run header
fn print_header(repo_path: &Path, format: &str) {
    // Suppress progress output for machine-readable formats
    if format == "json" {
        return;
    }

    println!("\n{}Bylines\n", style("🖋 ").bold());
    println!(
        "{}Annotating: {}",
        style("🔍 ").bold(),
        style(repo_path.display()).cyan()
    );
}

/// Print final summary message
fn print_final_summary(quiet_mode: bool, start_time: Instant) {
    if !quiet_mode {
        let elapsed = start_time.elapsed();
        println!(
            "\n{}Done in {:.2}s",
            style("✨ ").bold(),
            elapsed.as_secs_f64()
        );
    }
}

/// Create progress bar style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("█▓▒░  ")
}
