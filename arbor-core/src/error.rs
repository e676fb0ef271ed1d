//! Error types for arbor

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for arbor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for arbor operations
#[derive(Error, Debug)]
pub enum Error {
    /// A git command that was expected to succeed exited non-zero
    #[error("git command failed: {command}\n{stderr}")]
    Backend { command: String, stderr: String },

    /// The working directory is not inside a git repository
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// No worktree is bound to the requested branch
    #[error("No worktree found for branch '{0}'")]
    NotFound(String),

    /// The worktree has modified, staged or untracked entries
    #[error(
        "Worktree for '{branch}' has uncommitted changes at {}. \
         Please commit or discard them before destroying.",
        path.display()
    )]
    DirtyWorktree { branch: String, path: PathBuf },

    /// Neither recorded lineage nor a main branch could be found
    #[error(
        "Could not determine the parent branch of '{branch}'. \
         Please merge manually before destroying, or use --force."
    )]
    UnknownParent { branch: String },

    /// The branch is neither merged into its parent nor pushed
    #[error(
        "Branch '{branch}' contains unmerged changes. \
         Please merge the changes into '{parent}' before destroying the worktree, \
         push the latest commit to {remote} so it is preserved, \
         or use --force to delete anyway."
    )]
    UnsafeDestroy {
        branch: String,
        parent: String,
        remote: String,
    },

    /// The operator declined to attach to an already existing worktree
    #[error("Operation cancelled: worktree for '{branch}' already exists")]
    AttachDeclined { branch: String },

    /// The worktree was removed but the branch ref survived
    #[error(
        "Worktree for '{branch}' was removed, but deleting the branch failed:\n{stderr}\n\
         The branch still exists; delete it with `git branch -D {branch}` once its work is preserved."
    )]
    BranchDeleteFailed { branch: String, stderr: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interactive terminal failure
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
