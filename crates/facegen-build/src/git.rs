//! Commit-based staleness detection.
//!
//! Each module's output directory carries a `last_modified.txt` marker with
//! the commit it was last built from; a module rebuilds only when `git diff`
//! reports changes under its source directory since that commit.

use std::path::Path;

use crate::error::BuildError;
use crate::runner::{ToolCommand, ToolRunner};

pub const MARKER_FILE: &str = "last_modified.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitDiff {
    NoChange,
    /// Never built: no marker file, so everything is stale.
    NoLastCommit,
    ChangeSinceLastCommit,
}

impl GitDiff {
    #[must_use]
    pub fn changed(self) -> bool {
        self != GitDiff::NoChange
    }
}

/// Reads the commit recorded by the last successful build, if any.
#[must_use]
pub fn last_commit(output_dir: &Path) -> Option<String> {
    let text = std::fs::read_to_string(output_dir.join(MARKER_FILE)).ok()?;
    let line = text.lines().next()?.trim().to_string();
    (!line.is_empty()).then_some(line)
}

pub fn write_marker(output_dir: &Path, commit: &str) -> Result<(), BuildError> {
    let path = output_dir.join(MARKER_FILE);
    std::fs::write(&path, commit).map_err(|source| BuildError::Io { path, source })
}

pub fn head_commit(runner: &mut dyn ToolRunner) -> Result<String, BuildError> {
    let output = runner.run_checked(
        &ToolCommand::new("git").args(["log", "-n", "1", "--pretty=format:%H"]),
    )?;
    Ok(output.stdout.trim().to_string())
}

/// `git diff --quiet <commit> -- <dir>`: a nonzero exit means the tree
/// changed, which is an answer, not a failure.
pub fn has_changed_since(
    runner: &mut dyn ToolRunner,
    dir: &Path,
    last_commit: Option<&str>,
) -> Result<GitDiff, BuildError> {
    let Some(commit) = last_commit else {
        return Ok(GitDiff::NoLastCommit);
    };
    let output = runner.run(
        &ToolCommand::new("git")
            .args(["diff", "--quiet", commit, "--"])
            .arg(dir.to_string_lossy()),
    )?;
    if output.success {
        Ok(GitDiff::NoChange)
    } else {
        Ok(GitDiff::ChangeSinceLastCommit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_diff_truthiness() {
        assert!(!GitDiff::NoChange.changed());
        assert!(GitDiff::NoLastCommit.changed());
        assert!(GitDiff::ChangeSinceLastCommit.changed());
    }

    #[test]
    fn marker_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(last_commit(dir.path()), None);
        write_marker(dir.path(), "abc123").unwrap();
        assert_eq!(last_commit(dir.path()), Some("abc123".to_string()));
    }

    #[test]
    fn blank_marker_counts_as_unbuilt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MARKER_FILE), "\n").unwrap();
        assert_eq!(last_commit(dir.path()), None);
    }
}
