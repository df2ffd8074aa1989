use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::log_debug;

/// Locate the work tree root containing `dir`.
pub fn discover_repo_root(dir: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(dir)
        .map_err(|_| anyhow!("Not in a git repository. Please run anc from within a repository."))?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow!("Bare repositories have no working tree to stage from"))?;
    Ok(workdir.to_path_buf())
}

/// Executes a git command in `dir` and returns its stdout.
///
/// A non-zero exit becomes an error carrying `what` and git's stderr.
pub fn run_git_command(dir: &Path, args: &[&str], what: &str) -> Result<String> {
    log_debug!("Running git {:?} in {}", args, dir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        return Err(anyhow!(
            "{}: {}",
            what,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    String::from_utf8(output.stdout).context("Invalid UTF-8 output from git command")
}
