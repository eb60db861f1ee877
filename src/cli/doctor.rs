//! Doctor command - check environment

use anyhow::Result;
use std::path::Path;
use std::process::Command;

use crate::config::load_config;
use crate::git::GitHistory;
use crate::github::{IdentityResolver, DEFAULT_API_URL};

pub fn run(path: &Path) -> Result<()> {
    println!("🩺 Bylines Doctor\n");

    let mut all_ok = true;

    // Check the git binary
    match Command::new("git").arg("--version").output() {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            println!("✓ git binary: {}", version);
        }
        _ => {
            println!("✗ git binary: not found on PATH");
            all_ok = false;
        }
    }

    // Check the target repository
    match path.canonicalize() {
        Ok(repo_path) if GitHistory::is_git_repo(&repo_path) => {
            println!("✓ Git repository: {}", repo_path.display());
        }
        Ok(repo_path) => {
            println!("○ Git repository: {} is not a git work tree", repo_path.display());
            println!("  Annotations need commit history, so run bylines inside a repository");
        }
        Err(_) => {
            println!("✗ Git repository: path does not exist: {}", path.display());
            all_ok = false;
        }
    }

    // Check the token (optional - anonymous lookups work but are rate-limited)
    let has_token = std::env::var("GITHUB_TOKEN")
        .map(|t| !t.is_empty())
        .unwrap_or(false);
    if has_token {
        println!("✓ GITHUB_TOKEN: configured");
    } else {
        println!("○ GITHUB_TOKEN: not set");
        println!("  Anonymous commit searches are rate-limited to a handful per minute");
    }

    // Check GitHub API reachability
    let api_url = load_config(path)
        .github
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let resolver = IdentityResolver::from_env(&api_url);
    match resolver.ping() {
        Ok(status) => println!("✓ GitHub API: {} reachable (HTTP {})", api_url, status),
        Err(e) => {
            println!("✗ GitHub API: {} ({})", api_url, e);
            all_ok = false;
        }
    }

    if all_ok {
        println!("\n✅ All checks passed!");
    } else {
        println!("\n⚠️  Some checks failed, see above");
    }
    Ok(())
}
