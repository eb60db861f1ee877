//! Init command - write a starter config file

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::CONFIG_FILE;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    println!("\n{} Initializing Bylines\n", style("🖋").bold());

    let config_path = repo_path.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        let default_config = r#"# Bylines Configuration
# CLI flags override anything set here.

[content]
# Restrict discovery to one subdirectory (default: whole repository)
# dir = "_posts"

# Extensions treated as content
# extensions = ["md", "markdown", "html"]

[github]
# API root for GitHub Enterprise hosts (default: https://api.github.com)
# api_url = "https://github.example.com/api/v3"

[defaults]
# Default output format (text, json)
format = "text"

# Default number of parallel workers (1-64)
# workers = 8
"#;
        std::fs::write(&config_path, default_config)
            .with_context(|| "Failed to create config file")?;
        println!(
            "{} Created {}",
            style("✓").green(),
            style(CONFIG_FILE).cyan()
        );
    }

    println!("\n{} Repository initialized!", style("✨").bold());
    println!("\nNext steps:");
    println!(
        "  {} Annotate your content",
        style("bylines annotate .").cyan()
    );
    println!(
        "  {} Check git and API setup",
        style("bylines doctor").cyan()
    );
    println!(
        "  {} Raise the search rate limit",
        style("export GITHUB_TOKEN=...").cyan()
    );

    Ok(())
}
