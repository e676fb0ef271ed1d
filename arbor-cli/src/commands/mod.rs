//! CLI command implementations

pub mod attach;
pub mod create;
pub mod destroy;
pub mod list;

pub use attach::AttachArgs;
pub use create::CreateArgs;
pub use destroy::DestroyArgs;

use arbor_core::{Config, GitRepo, Lifecycle};

use crate::terminal::TerminalConsole;

/// Controller for the repository containing the current directory
pub(crate) fn lifecycle(config: &Config) -> anyhow::Result<Lifecycle<TerminalConsole>> {
    let cwd = std::env::current_dir()?;
    let repo = GitRepo::open(&cwd)?.with_remote(config.git.remote.as_str());
    Ok(Lifecycle::new(repo, config.clone(), TerminalConsole::new(), cwd))
}
