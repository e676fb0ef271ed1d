//! Destroy command - remove a worktree and delete its branch once its work is safe

use clap::Args;
use arbor_core::Config;

/// Arguments for the destroy command
#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Branch whose worktree to destroy; omit to pick from a menu
    pub branch: Option<String>,

    /// Skip the merged-or-pushed check and force-delete the branch
    /// (uncommitted changes still block destruction)
    #[arg(long)]
    pub force: bool,
}

impl DestroyArgs {
    /// Execute the destroy command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut lifecycle = super::lifecycle(config)?;

        let outcome = match &self.branch {
            Some(branch) => lifecycle.destroy(branch, self.force)?,
            None => lifecycle.destroy_interactive(self.force)?,
        };
        tracing::debug!(?outcome, "Destroy finished");

        Ok(())
    }
}
