//! Attach command - resume inside an existing worktree

use clap::Args;
use arbor_core::{Config, Outcome};

use crate::shell;

/// Arguments for the attach command
#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Branch whose worktree to enter; omit to pick from a menu
    pub branch: Option<String>,
}

impl AttachArgs {
    /// Execute the attach command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut lifecycle = super::lifecycle(config)?;

        let outcome = match &self.branch {
            Some(branch) => lifecycle.attach(branch)?,
            None => lifecycle.attach_interactive()?,
        };

        match outcome {
            Outcome::Enter(entry) => shell::hand_off(&entry.dir, config),
            _ => Ok(()),
        }
    }
}
