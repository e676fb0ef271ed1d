//! Hand-off to an interactive shell inside a worktree

use std::borrow::Cow;
use std::path::Path;
use std::process::Command;

use anyhow::Context;
use arbor_core::Config;

/// Build the command that runs the workspace command (if any) and then leaves
/// the user in `shell`
pub(crate) fn shell_command(shell: &str, workspace_command: &[String]) -> Command {
    let mut command = Command::new(shell);
    if !workspace_command.is_empty() {
        let script = format!("{}; exec {}", command_line(workspace_command), quote(shell));
        command.arg("-c").arg(script);
    }
    command
}

/// Replace this process with a shell rooted at `dir`
pub(crate) fn hand_off(dir: &Path, config: &Config) -> anyhow::Result<()> {
    let shell = config.shell();
    let mut command = shell_command(shell, &config.workspace.command);
    command.current_dir(dir).env("PWD", dir);
    tracing::debug!(shell, dir = %dir.display(), "Handing off to shell");
    run(command, shell)
}

#[cfg(unix)]
fn run(mut command: Command, shell: &str) -> anyhow::Result<()> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure
    let err = command.exec();
    Err(err).with_context(|| format!("Failed to start shell {shell}"))
}

#[cfg(not(unix))]
fn run(mut command: Command, shell: &str) -> anyhow::Result<()> {
    let status = command
        .status()
        .with_context(|| format!("Failed to start shell {shell}"))?;
    std::process::exit(status.code().unwrap_or(1));
}

/// Render argv tokens as one line a POSIX shell splits back into the same tokens
pub(crate) fn command_line(tokens: &[String]) -> String {
    let quoted: Vec<Cow<'_, str>> = tokens.iter().map(|token| quote(token)).collect();
    quoted.join(" ")
}

fn quote(token: &str) -> Cow<'_, str> {
    let plain = !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_./=:,+@%".contains(&b));
    if plain {
        Cow::Borrowed(token)
    } else {
        // Close the quote, emit an escaped quote, reopen
        Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
    }
}
