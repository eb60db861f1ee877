//! Project-level configuration
//!
//! Loads per-repository settings from `bylines.toml` in the repository root.
//! A missing file is not an error; a broken one logs a warning and falls
//! back to defaults. CLI flags override anything set here.
//!
//! # Configuration Format
//!
//! ```toml
//! # bylines.toml
//!
//! [content]
//! dir = "_posts"
//! extensions = ["md", "markdown"]
//!
//! [github]
//! api_url = "https://github.example.com/api/v3"
//!
//! [defaults]
//! format = "text"
//! workers = 8
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Config file name searched at the repository root.
pub const CONFIG_FILE: &str = "bylines.toml";

/// Per-repository configuration loaded from `bylines.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BylinesConfig {
    /// Content discovery settings
    #[serde(default)]
    pub content: ContentConfig,

    /// GitHub API settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Which files count as content.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContentConfig {
    /// Restrict discovery to this subdirectory of the repository
    #[serde(default)]
    pub dir: Option<String>,

    /// Extensions treated as content (default: md, markdown, html)
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

/// GitHub API settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GithubConfig {
    /// Base API URL override, for GitHub Enterprise hosts
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Default CLI flags that can be set in project config.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Load configuration from the repository root.
///
/// Returns default configuration when no config file exists or the file
/// cannot be parsed.
pub fn load_config(repo_path: &Path) -> BylinesConfig {
    let toml_path = repo_path.join(CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("loaded config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("no config file found, using defaults");
    BylinesConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<BylinesConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: BylinesConfig = toml::from_str(&content)?;
    Ok(config)
}
