use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::status::{ChangedFile, parse_porcelain};
use super::utils::{discover_repo_root, run_git_command};
use crate::log_debug;

/// The version-control operations the session relies on.
///
/// Every call is synchronous and either succeeds for the whole batch or
/// returns an error describing the failure.
pub trait Vcs: Send + Sync {
    /// Staged, unstaged and untracked changes in listing order
    fn list_changes(&self) -> Result<Vec<ChangedFile>>;

    /// Paths currently in the index that differ from HEAD
    fn list_staged(&self) -> Result<Vec<String>>;

    /// Stage `paths`; no-op on empty input
    fn stage(&self, paths: &[String]) -> Result<()>;

    /// Unstage `paths`; no-op on empty input
    fn unstage(&self, paths: &[String]) -> Result<()>;

    /// Combined staged diff
    fn diff(&self) -> Result<String>;

    /// Staged diff for a single path
    fn diff_for(&self, path: &str) -> Result<String>;

    fn commit(&self, message: &str) -> Result<()>;

    /// Start an unstage without waiting for it to finish.
    ///
    /// Used for cleanup on exit, where nobody is left to read the result.
    fn unstage_detached(&self, paths: &[String]) {
        if let Err(e) = self.unstage(paths) {
            log_debug!("Cleanup unstage failed: {}", e);
        }
    }
}

/// `Vcs` backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Operate on the work tree rooted at `workdir`
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    /// Find the repository containing `dir`
    pub fn discover(dir: &Path) -> Result<Self> {
        let workdir = discover_repo_root(dir)?;
        log_debug!("Using repository at {}", workdir.display());
        Ok(Self { workdir })
    }

    fn git(&self, args: &[&str], what: &str) -> Result<String> {
        run_git_command(&self.workdir, args, what)
    }

    /// A freshly initialised repository has no HEAD to reset against
    fn has_head(&self) -> bool {
        self.git(&["rev-parse", "--verify", "--quiet", "HEAD"], "No HEAD")
            .is_ok()
    }

    fn unstage_args(&self, paths: &[String]) -> Vec<String> {
        let mut args: Vec<String> = if self.has_head() {
            vec!["reset".into(), "-q".into(), "HEAD".into(), "--".into()]
        } else {
            vec![
                "rm".into(),
                "--cached".into(),
                "-r".into(),
                "-q".into(),
                "--ignore-unmatch".into(),
                "--".into(),
            ]
        };
        args.extend(paths.iter().cloned());
        args
    }
}

impl Vcs for GitCli {
    fn list_changes(&self) -> Result<Vec<ChangedFile>> {
        let output = self.git(
            &["status", "--porcelain", "-z", "-uall"],
            "Failed to get git status",
        )?;
        let files = parse_porcelain(&output);
        log_debug!("Found {} changed files", files.len());
        Ok(files)
    }

    fn list_staged(&self) -> Result<Vec<String>> {
        let output = self.git(
            &["diff", "--cached", "--name-only", "-z"],
            "Failed to get staged files",
        )?;
        Ok(output
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(String::from)
            .collect())
    }

    fn stage(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args, "Failed to stage files")?;
        log_debug!("Staged {} files", paths.len());
        Ok(())
    }

    fn unstage(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let args = self.unstage_args(paths);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.git(&args, "Failed to unstage files")?;
        log_debug!("Unstaged {} files", paths.len());
        Ok(())
    }

    fn diff(&self) -> Result<String> {
        self.git(&["diff", "--cached"], "Failed to get staged diff")
    }

    fn diff_for(&self, path: &str) -> Result<String> {
        self.git(
            &["diff", "--cached", "--", path],
            "Failed to get staged diff for file",
        )
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message], "Failed to commit")?;
        log_debug!("Commit created");
        Ok(())
    }

    fn unstage_detached(&self, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        let args = self.unstage_args(paths);
        let spawned = Command::new("git")
            .args(&args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn cleanup");
        match spawned {
            Ok(_child) => log_debug!("Cleanup unstage started for {} files", paths.len()),
            Err(e) => log_debug!("{}", e),
        }
    }
}
