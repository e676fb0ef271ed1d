//! Worktree lifecycle controller
//!
//! A branch moves through these states:
//!
//! ```text
//! NO_BRANCH -> BRANCH_NO_WORKTREE -> BRANCH_WITH_WORKTREE -> DESTROYED
//! ```
//!
//! Every operation re-queries git before it acts, and every mutation is
//! preceded by the check that makes it safe. Side effects run strictly in
//! order with no rollback: a failure leaves earlier steps in place.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::console::Console;
use crate::copy::copy_untracked_paths;
use crate::git::{GitRepo, WorktreeLocation};
use crate::{Error, Result};

const CANCEL_LABEL: &str = "Cancel";

/// Where the operator should be handed off after create or attach
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Root of the worktree
    pub worktree: PathBuf,
    /// Directory inside the worktree matching the operator's relative position
    pub dir: PathBuf,
}

/// Result of a lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Resume inside this worktree
    Enter(Entry),
    /// The worktree was removed and its branch deleted
    Destroyed { branch: String, worktree: PathBuf },
    /// Nothing was done (empty list, menu dismissed, or confirmation declined)
    Cancelled,
}

/// Orchestrates create, attach and destroy for branch-bound worktrees
pub struct Lifecycle<C: Console> {
    repo: GitRepo,
    config: Config,
    console: C,
    /// Directory the operator invoked arbor from
    cwd: PathBuf,
}

impl<C: Console> Lifecycle<C> {
    pub fn new(repo: GitRepo, config: Config, console: C, cwd: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            config,
            console,
            cwd: cwd.into(),
        }
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Create (or offer to attach to) the worktree for `branch`
    pub fn create(&mut self, branch: &str) -> Result<Outcome> {
        let relative = self.relative_subpath();

        let path = match self.repo.locate_or_plan(branch)? {
            WorktreeLocation::Found(_) => {
                self.console
                    .info(&format!("Worktree '{branch}' already exists."));
                if !self.console.confirm("Would you like to attach instead?")? {
                    self.console.info("Operation cancelled.");
                    return Err(Error::AttachDeclined {
                        branch: branch.to_string(),
                    });
                }
                return self.attach(branch);
            }
            WorktreeLocation::Planned(path) => path,
        };

        if !self.repo.branch_exists(branch)? {
            self.create_branch(branch)?;
        }

        if let Some(container) = path.parent() {
            fs::create_dir_all(container)?;
        }
        self.console
            .info(&format!("Creating new worktree at: {}", path.display()));
        self.repo.add_worktree(&path, branch)?;
        info!(branch, path = %path.display(), "Created worktree");

        let entry = enter_dir(&path, &relative)?;
        self.seed_untracked(&entry.dir);

        self.console
            .info(&format!("Launching workspace in: {}", entry.dir.display()));
        Ok(Outcome::Enter(entry))
    }

    /// Resume inside the existing worktree for `branch`
    pub fn attach(&mut self, branch: &str) -> Result<Outcome> {
        let relative = self.relative_subpath();

        let path = self
            .repo
            .worktree_path_for(branch)?
            .ok_or_else(|| Error::NotFound(branch.to_string()))?;

        let entry = enter_dir(&path, &relative)?;
        self.console
            .info(&format!("Attaching to worktree in: {}", entry.dir.display()));
        Ok(Outcome::Enter(entry))
    }

    /// Pick a worktree from a menu and attach to it
    pub fn attach_interactive(&mut self) -> Result<Outcome> {
        match self.pick_worktree("attach to")? {
            Some(branch) => self.attach(&branch),
            None => Ok(Outcome::Cancelled),
        }
    }

    /// Remove the worktree for `branch` and delete the branch
    ///
    /// The worktree must be clean, even with `force`. Without `force`, the
    /// branch must be merged into its parent or have its tip on the remote.
    pub fn destroy(&mut self, branch: &str, force: bool) -> Result<Outcome> {
        let path = self
            .repo
            .worktree_path_for(branch)?
            .ok_or_else(|| Error::NotFound(branch.to_string()))?;

        if self.repo.has_uncommitted_changes(&path)? {
            return Err(Error::DirtyWorktree {
                branch: branch.to_string(),
                path,
            });
        }

        let parent = self.resolve_parent(branch)?;

        if force {
            self.console
                .info("Force flag enabled, skipping merge check...");
        } else {
            self.ensure_preserved(branch, &parent, &path)?;
        }

        self.console
            .info(&format!("Removing worktree at: {}", path.display()));
        self.repo.remove_worktree(&path, true)?;

        self.console
            .info(&format!("Deleting local branch: {branch}"));
        self.repo
            .delete_branch(branch, force)
            .map_err(|e| match e {
                Error::Backend { stderr, .. } => Error::BranchDeleteFailed {
                    branch: branch.to_string(),
                    stderr,
                },
                other => other,
            })?;

        info!(branch, path = %path.display(), force, "Destroyed worktree");
        self.console.info(&format!(
            "Successfully destroyed worktree and branch '{branch}'"
        ));
        Ok(Outcome::Destroyed {
            branch: branch.to_string(),
            worktree: path,
        })
    }

    /// Pick a worktree from a menu, confirm, and destroy it
    pub fn destroy_interactive(&mut self, force: bool) -> Result<Outcome> {
        let Some(branch) = self.pick_worktree("destroy")? else {
            return Ok(Outcome::Cancelled);
        };

        self.console.info(&format!("Selected: {branch}"));
        let prompt =
            format!("Are you sure you want to destroy the worktree for '{branch}'?");
        if !self.console.confirm(&prompt)? {
            self.console.info("Cancelled.");
            return Ok(Outcome::Cancelled);
        }

        self.destroy(&branch, force)
    }

    /// Create `branch` from the current branch, record lineage, and switch back
    fn create_branch(&mut self, branch: &str) -> Result<()> {
        let parent = self.repo.current_branch()?;
        match &parent {
            Some(parent) => self
                .console
                .info(&format!("Creating new branch: {branch} from {parent}")),
            None => {
                self.console
                    .info(&format!("Creating new branch: {branch} from detached HEAD"));
                self.console
                    .warn("HEAD is detached; no parent branch will be recorded");
            }
        }

        self.repo.checkout_new_branch(branch)?;
        let recorded = match &parent {
            Some(parent) => self.repo.record_parent(branch, parent),
            None => Ok(()),
        };
        // Switch back even if recording failed, then report the first error
        self.repo.checkout_previous()?;
        recorded
    }

    /// Recorded lineage, else the guessed main branch
    fn resolve_parent(&mut self, branch: &str) -> Result<String> {
        if let Some(parent) = self.repo.read_parent(branch)? {
            debug!(branch, parent, "Using recorded parent");
            return Ok(parent);
        }

        self.console.warn(&format!(
            "No parent branch information found for '{branch}'"
        ));
        let guess = self
            .repo
            .main_branch_guess(&self.config.git.main_branch_candidates)?
            .ok_or_else(|| Error::UnknownParent {
                branch: branch.to_string(),
            })?;
        self.console
            .info(&format!("Using '{guess}' as the parent branch"));
        Ok(guess)
    }

    /// Fail unless `branch` is merged into `parent` or its tip is on the remote
    fn ensure_preserved(&mut self, branch: &str, parent: &str, worktree: &Path) -> Result<()> {
        let remote = self.repo.remote().to_string();
        self.console.info(&format!(
            "Checking if '{branch}' has been merged into '{parent}' or pushed to {remote}..."
        ));

        if self.repo.is_merged(branch, parent, worktree)? {
            debug!(branch, parent, "Branch is merged into parent");
            return Ok(());
        }
        if self.repo.is_pushed(branch)? {
            debug!(branch, remote, "Branch tip matches remote");
            return Ok(());
        }

        Err(Error::UnsafeDestroy {
            branch: branch.to_string(),
            parent: parent.to_string(),
            remote,
        })
    }

    /// Show the worktree menu; `None` when empty, dismissed, or cancelled
    fn pick_worktree(&mut self, action: &str) -> Result<Option<String>> {
        let worktrees = self.repo.list_worktrees()?;
        if worktrees.is_empty() {
            self.console
                .info(&format!("No worktrees found to {action}."));
            return Ok(None);
        }

        let mut items: Vec<String> = worktrees.iter().map(|wt| wt.branch.clone()).collect();
        items.push(CANCEL_LABEL.to_string());

        let title = format!("Select a worktree to {action}:");
        match self.console.select(&title, &items)? {
            Some(index) if index < worktrees.len() => Ok(Some(worktrees[index].branch.clone())),
            _ => {
                self.console.info("Cancelled.");
                Ok(None)
            }
        }
    }

    /// Copy configured untracked paths from the invoking directory into `dir`
    fn seed_untracked(&mut self, dir: &Path) {
        let report = copy_untracked_paths(
            &self.repo,
            &self.cwd,
            dir,
            &self.config.workspace.copy_untracked,
        );
        debug!(copied = report.copied, failed = report.failures.len(), "Seeded worktree");

        if let Some(warning) = report.failure_summary() {
            self.console.warn(&warning);
        }
    }

    /// Operator's position relative to the toplevel of their current checkout
    fn relative_subpath(&self) -> PathBuf {
        let cwd = crate::git::canonical(&self.cwd);
        cwd.strip_prefix(self.repo.checkout())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// `worktree/relative`, created if missing
fn enter_dir(worktree: &Path, relative: &Path) -> Result<Entry> {
    let dir = if relative.as_os_str().is_empty() {
        worktree.to_path_buf()
    } else {
        let dir = worktree.join(relative);
        fs::create_dir_all(&dir)?;
        dir
    };
    Ok(Entry {
        worktree: worktree.to_path_buf(),
        dir,
    })
}
