//! List command - show worktrees bound to branches

use arbor_core::{Config, GitRepo};

/// Print each worktree as `<branch>\t<path>`
pub fn execute(config: &Config) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let repo = GitRepo::open(&cwd)?.with_remote(config.git.remote.as_str());

    let worktrees = repo.list_worktrees()?;
    if worktrees.is_empty() {
        println!("No worktrees found.");
        return Ok(());
    }

    for worktree in worktrees {
        println!("{}\t{}", worktree.branch, worktree.path.display());
    }

    Ok(())
}
