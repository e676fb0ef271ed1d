//! Arbor Core - branch-bound git worktree lifecycle
//!
//! This crate creates, attaches to, and safely destroys git worktrees tied to
//! feature branches. Destruction only proceeds once a branch's work is
//! preserved: merged into the branch it was forked from, or pushed.

pub mod config;
pub mod console;
pub mod copy;
pub mod error;
pub mod git;
pub mod lifecycle;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use console::Console;
pub use error::{Error, Result};
pub use git::{GitRepo, WorktreeEntry, WorktreeLocation};
pub use lifecycle::{Entry, Lifecycle, Outcome};
