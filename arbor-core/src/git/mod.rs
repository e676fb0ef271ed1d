//! Git operations for arbor
//!
//! This module provides repository detection, read-only queries, branch
//! lineage records, and worktree management on top of the git CLI.

mod branch;
mod cli;
mod lineage;
mod repo;
mod worktree;

pub use lineage::{format_parent_record, parse_parent_record};
pub(crate) use repo::canonical;
pub use repo::GitRepo;
pub use worktree::{parse_worktree_porcelain, planned_worktree_path, WorktreeEntry, WorktreeLocation};
