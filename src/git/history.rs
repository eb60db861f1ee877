//! Per-file git history queries via the `git` CLI
//!
//! Every query spawns `git log` with an argument vector and a `--` pathspec
//! separator; paths are never interpolated into a shell string, so pathnames
//! containing quotes, spaces, or metacharacters cannot alter the command.
//!
//! Failure contract: a spawn error, a non-zero exit status, or empty output
//! all mean "no history" (`None` / empty vec). Nothing here returns an error
//! or panics; callers that care about missing history decide what to log.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Git history reader rooted at one repository (or any directory inside it).
pub struct GitHistory {
    root: PathBuf,
}

impl GitHistory {
    /// Create a reader that runs its queries from `root`.
    ///
    /// Document paths handed to the query methods are interpreted relative
    /// to `root`. Callers validate the directory first with [`is_git_repo`]
    /// (a reader over a non-repository simply reports no history for every
    /// path).
    ///
    /// [`is_git_repo`]: GitHistory::is_git_repo
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory queries run from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether a directory is inside a git work tree.
    pub fn is_git_repo(path: &Path) -> bool {
        Command::new("git")
            .args(["rev-parse", "--git-dir"])
            .current_dir(path)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    /// Timestamp of the most recent commit touching `path`, as a strict
    /// ISO-8601 string, following renames. `None` when the path has no
    /// history.
    pub fn last_modified(&self, path: &str) -> Option<String> {
        let stdout = self.run_log(&["--follow", "--format=%ad", "--date=iso-strict"], path)?;
        first_line(&stdout)
    }

    /// Author email of the earliest commit touching `path` (the file's
    /// original author). `None` when the path has no history.
    pub fn first_author_email(&self, path: &str) -> Option<String> {
        let stdout = self.run_log(&["--reverse", "--format=%ae"], path)?;
        first_line(&stdout)
    }

    /// Author emails of every commit touching `path`, newest first,
    /// duplicates preserved. Empty when the path has no history.
    pub fn commit_emails(&self, path: &str) -> Vec<String> {
        match self.run_log(&["--format=%ae"], path) {
            Some(stdout) => stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Run `git log <args> -- <path>` and return stdout on success.
    fn run_log(&self, args: &[&str], path: &str) -> Option<String> {
        let output = Command::new("git")
            .arg("log")
            .args(args)
            .arg("--")
            .arg(path)
            .current_dir(&self.root)
            .output();

        let output = match output {
            Ok(out) => out,
            Err(e) => {
                debug!("failed to spawn git log for {}: {}", path, e);
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                "git log {} for {}: {}",
                output.status,
                path,
                stderr.trim()
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// First non-empty line, trimmed.
fn first_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .expect("run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "--quiet"]);
        git(dir, &["config", "user.name", "Test User"]);
        git(dir, &["config", "user.email", "test@example.com"]);
    }

    fn commit(dir: &Path, file: &str, content: &str, email: &str, date: &str) {
        fs::write(dir.join(file), content).expect("write fixture file");
        git(dir, &["add", "."]);
        let status = Command::new("git")
            .args(["commit", "--quiet", "-m", "update"])
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Test User")
            .env("GIT_AUTHOR_EMAIL", email)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_NAME", "Test User")
            .env("GIT_COMMITTER_EMAIL", email)
            .env("GIT_COMMITTER_DATE", date)
            .status()
            .expect("run git commit");
        assert!(status.success(), "git commit failed");
    }

    #[test]
    fn is_git_repo_detects_work_trees() {
        let dir = tempdir().expect("tempdir");
        assert!(!GitHistory::is_git_repo(dir.path()));

        init_repo(dir.path());
        assert!(GitHistory::is_git_repo(dir.path()));
    }

    #[test]
    fn no_history_degrades_to_none() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        fs::write(dir.path().join("untracked.md"), "draft").expect("write file");

        let history = GitHistory::new(dir.path());
        assert_eq!(history.last_modified("untracked.md"), None);
        assert_eq!(history.first_author_email("untracked.md"), None);
        assert!(history.commit_emails("untracked.md").is_empty());
        assert_eq!(history.last_modified("does-not-exist.md"), None);
    }

    #[test]
    fn non_repo_directory_reports_no_history() {
        let dir = tempdir().expect("tempdir");
        let history = GitHistory::new(dir.path());
        assert_eq!(history.last_modified("anything.md"), None);
        assert!(history.commit_emails("anything.md").is_empty());
    }

    #[test]
    fn last_modified_is_newest_commit_date() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        commit(
            dir.path(),
            "post.md",
            "v1",
            "alice@example.com",
            "2024-01-05T08:30:00+00:00",
        );
        commit(
            dir.path(),
            "post.md",
            "v2",
            "bob@example.com",
            "2024-02-10T12:00:00+00:00",
        );

        let history = GitHistory::new(dir.path());
        assert_eq!(
            history.last_modified("post.md").as_deref(),
            Some("2024-02-10T12:00:00+00:00")
        );
    }

    #[test]
    fn last_modified_survives_renames() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        commit(
            dir.path(),
            "old-name.md",
            "v1",
            "alice@example.com",
            "2024-01-05T08:30:00+00:00",
        );
        git(dir.path(), &["mv", "old-name.md", "new-name.md"]);
        let status = Command::new("git")
            .args(["commit", "--quiet", "-m", "rename"])
            .current_dir(dir.path())
            .env("GIT_AUTHOR_NAME", "Test User")
            .env("GIT_AUTHOR_EMAIL", "alice@example.com")
            .env("GIT_AUTHOR_DATE", "2024-03-01T09:00:00+00:00")
            .env("GIT_COMMITTER_NAME", "Test User")
            .env("GIT_COMMITTER_EMAIL", "alice@example.com")
            .env("GIT_COMMITTER_DATE", "2024-03-01T09:00:00+00:00")
            .status()
            .expect("run git commit");
        assert!(status.success(), "rename commit failed");

        let history = GitHistory::new(dir.path());
        assert_eq!(
            history.last_modified("new-name.md").as_deref(),
            Some("2024-03-01T09:00:00+00:00")
        );
        // Email queries deliberately do not follow renames; only the rename
        // commit itself touched the new path.
        assert_eq!(
            history.commit_emails("new-name.md"),
            vec!["alice@example.com".to_string()]
        );
    }

    #[test]
    fn first_author_email_is_oldest_committer() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        commit(
            dir.path(),
            "post.md",
            "v1",
            "alice@example.com",
            "2024-01-05T08:30:00+00:00",
        );
        commit(
            dir.path(),
            "post.md",
            "v2",
            "bob@example.com",
            "2024-02-10T12:00:00+00:00",
        );

        let history = GitHistory::new(dir.path());
        assert_eq!(
            history.first_author_email("post.md").as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn commit_emails_newest_first_with_duplicates() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        commit(
            dir.path(),
            "post.md",
            "v1",
            "alice@example.com",
            "2024-01-05T08:30:00+00:00",
        );
        commit(
            dir.path(),
            "post.md",
            "v2",
            "alice@example.com",
            "2024-01-06T08:30:00+00:00",
        );
        commit(
            dir.path(),
            "post.md",
            "v3",
            "bob@example.com",
            "2024-02-10T12:00:00+00:00",
        );

        let history = GitHistory::new(dir.path());
        assert_eq!(
            history.commit_emails("post.md"),
            vec![
                "bob@example.com".to_string(),
                "alice@example.com".to_string(),
                "alice@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn quoted_path_is_a_plain_argument() {
        let dir = tempdir().expect("tempdir");
        init_repo(dir.path());
        // A path that would break a shell-interpolated command line.
        let tricky = "it's a \"post\".md";
        commit(
            dir.path(),
            tricky,
            "v1",
            "alice@example.com",
            "2024-01-05T08:30:00+00:00",
        );

        let history = GitHistory::new(dir.path());
        assert_eq!(
            history.last_modified(tricky).as_deref(),
            Some("2024-01-05T08:30:00+00:00")
        );
        assert_eq!(
            history.first_author_email(tricky).as_deref(),
            Some("alice@example.com")
        );
    }
}
