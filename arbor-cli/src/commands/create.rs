//! Create command - new branch worktree, then hand off to a shell in it

use clap::Args;
use arbor_core::{Config, Outcome};

use crate::shell;

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Branch to create a worktree for (created from the current branch if missing)
    pub branch: String,
}

impl CreateArgs {
    /// Execute the create command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut lifecycle = super::lifecycle(config)?;

        match lifecycle.create(&self.branch)? {
            Outcome::Enter(entry) => shell::hand_off(&entry.dir, config),
            outcome => {
                tracing::debug!(?outcome, "Create finished without entering a worktree");
                Ok(())
            }
        }
    }
}
