//! CLI command definitions and handlers

pub(crate) mod annotate;
mod doctor;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Bylines - Git history and GitHub authorship for content files
#[derive(Parser, Debug)]
#[command(name = "bylines")]
#[command(
    version,
    about = "Annotate content files with git timestamps, authors, and editors resolved to GitHub profiles",
    long_about = "Bylines walks the content files of a repository and annotates each one with \
its last-modified timestamp, the GitHub profile of its original author, and a list \
of editors ordered by how many commits each contributed.\n\n\
Timestamps come from local git history. Authors and editors are resolved by \
searching the GitHub commits API for each committer email.\n\n\
Run without a subcommand to annotate the current directory:\n  \
bylines .",
    after_help = "\
Examples:
  bylines .                            Annotate current directory
  bylines annotate . --format json     JSON output for a site build
  bylines annotate . --content _posts  Only look under _posts/
  bylines annotate . --offline         Timestamps only, no GitHub lookups
  bylines doctor                       Check git, token, and API reachability

Documentation: https://github.com/bylines-dev/bylines"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "8", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a bylines.toml config file with example settings
    Init,

    /// Annotate content files with git metadata (the default command)
    #[command(after_help = "\
Examples:
  bylines annotate .                         Annotate current directory
  bylines annotate /path/to/blog             Annotate a specific repo
  bylines annotate . --format json           JSON output for scripting
  bylines annotate . -o bylines.json -f json Write the report to a file
  bylines annotate . --content _posts        Only discover files under _posts/
  bylines annotate . --ext md --ext adoc     Override content extensions
  bylines annotate . --offline               Skip GitHub lookups (timestamps only)
  bylines annotate . --api-url https://github.example.com/api/v3   GitHub Enterprise")]
    Annotate {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Only discover content under this subdirectory of the repo
        #[arg(long)]
        content: Option<String>,

        /// Content file extension to discover (repeatable; default: md, markdown, html)
        #[arg(long = "ext")]
        ext: Vec<String>,

        /// Skip GitHub lookups and annotate timestamps only
        #[arg(long)]
        offline: bool,

        /// GitHub API base URL, for GitHub Enterprise
        #[arg(long, env = "BYLINES_API_URL")]
        api_url: Option<String>,
    },

    /// Check environment setup (git binary, work tree, token, API reachability)
    Doctor,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Annotate {
            format,
            output,
            content,
            ext,
            offline,
            api_url,
        }) => annotate::run(
            &cli.path,
            &format,
            output.as_deref(),
            content,
            ext,
            offline,
            api_url,
            cli.workers,
        ),

        Some(Commands::Doctor) => doctor::run(&cli.path),

        None => {
            // Check if the path looks like an unknown subcommand
            check_unknown_subcommand(&cli.path)?;
            // Default: annotate everything, text to stdout
            annotate::run(
                &cli.path,
                "text",
                None,
                None,
                vec![],
                false,
                None,
                cli.workers,
            )
        }
    }
}

fn check_unknown_subcommand(path: &std::path::Path) -> anyhow::Result<()> {
    let path_str = path.to_string_lossy();
    let looks_like_command = !path.exists()
        && !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.starts_with('.');
    if !looks_like_command {
        return Ok(());
    }
    let known_commands = ["init", "annotate", "doctor"];
    if !known_commands.contains(&path_str.as_ref()) {
        anyhow::bail!(
            "Unknown command '{}'. Run 'bylines --help' for available commands.\n\nDid you mean one of: {}?",
            path_str,
            known_commands.join(", ")
        );
    }
    Ok(())
}
