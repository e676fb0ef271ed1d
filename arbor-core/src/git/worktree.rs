//! Git worktree listing, placement and management

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::cli;
use super::repo::{canonical, GitRepo};
use crate::{Error, Result};

/// A linked worktree bound to a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    /// Short branch name (without `refs/heads/`)
    pub branch: String,
    /// Path to the worktree directory
    pub path: PathBuf,
}

/// Where a branch's worktree lives or would live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeLocation {
    /// A worktree is already bound to the branch
    Found(PathBuf),
    /// No worktree yet; this is where one will be created
    Planned(PathBuf),
}

impl WorktreeLocation {
    /// The path regardless of state
    pub fn path(&self) -> &Path {
        match self {
            WorktreeLocation::Found(path) | WorktreeLocation::Planned(path) => path,
        }
    }
}

/// Parse `git worktree list --porcelain` into (path, branch) records
///
/// Entries without a `branch refs/heads/...` line (bare, detached) are dropped.
pub fn parse_worktree_porcelain(raw: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current_path: Option<PathBuf> = None;

    for line in raw.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            current_path = Some(PathBuf::from(path));
        } else if let Some(reference) = line.strip_prefix("branch ") {
            if let (Some(path), Some(branch)) =
                (current_path.take(), reference.trim().strip_prefix("refs/heads/"))
            {
                entries.push(WorktreeEntry {
                    branch: branch.to_string(),
                    path,
                });
            }
        } else if line.is_empty() || line == "bare" || line == "detached" {
            current_path = None;
        }
    }

    entries
}

/// Path for a branch's new worktree inside `container`
///
/// Purely name-based: the branch name is used as the subdirectory, so
/// `feature/x` nests as `feature/x`.
pub fn planned_worktree_path(container: &Path, branch: &str) -> PathBuf {
    container.join(branch)
}

impl GitRepo {
    /// List linked worktrees with their branches, excluding the main repository
    pub fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>> {
        let raw = cli::run_checked(self.root(), ["worktree", "list", "--porcelain"])?;

        Ok(parse_worktree_porcelain(&raw)
            .into_iter()
            .map(|entry| WorktreeEntry {
                path: canonical(&entry.path),
                ..entry
            })
            .filter(|entry| entry.path != self.root())
            .collect())
    }

    /// Path of the worktree bound to `branch`, if any
    pub fn worktree_path_for(&self, branch: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .list_worktrees()?
            .into_iter()
            .find(|entry| entry.branch == branch)
            .map(|entry| entry.path))
    }

    /// Sibling directory holding this repository's worktrees: `<repo>-worktrees`
    pub fn worktrees_container(&self) -> Result<PathBuf> {
        let parent = self.root().parent().ok_or_else(|| {
            Error::Config(format!(
                "Repository root {} has no parent directory for worktrees",
                self.root().display()
            ))
        })?;
        Ok(parent.join(format!("{}-worktrees", self.repo_name())))
    }

    /// Existing worktree path for `branch`, or the path a new one would take
    pub fn locate_or_plan(&self, branch: &str) -> Result<WorktreeLocation> {
        if let Some(path) = self.worktree_path_for(branch)? {
            return Ok(WorktreeLocation::Found(path));
        }
        Ok(WorktreeLocation::Planned(planned_worktree_path(
            &self.worktrees_container()?,
            branch,
        )))
    }

    /// Bind a new worktree at `path` to the existing `branch`
    pub fn add_worktree(&self, path: &Path, branch: &str) -> Result<()> {
        cli::run_checked(
            self.root(),
            [
                OsStr::new("worktree"),
                OsStr::new("add"),
                path.as_os_str(),
                OsStr::new(branch),
            ],
        )?;
        Ok(())
    }

    /// Remove the worktree at `path`
    ///
    /// `force` lets git discard files it does not track, such as build output.
    pub fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        let mut args = vec![OsStr::new("worktree"), OsStr::new("remove")];
        if force {
            args.push(OsStr::new("--force"));
        }
        args.push(path.as_os_str());
        cli::run_checked(self.root(), args)?;
        Ok(())
    }
}
