//! Low-level git command runner
//!
//! Every query and mutation goes through the git CLI so that worktree-aware
//! behaviour (hooks, `branch --merged` relative to the active checkout) matches
//! what the operator sees from their shell.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::{Error, Result};

/// Captured result of a git invocation
#[derive(Debug)]
pub(crate) struct GitOutput {
    /// Rendered command line, used in error messages
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turn a non-zero exit into [`Error::Backend`], returning trimmed stdout otherwise
    pub fn check(self) -> Result<String> {
        if !self.success() {
            return Err(Error::Backend {
                command: self.command,
                stderr: self.stderr.trim().to_string(),
            });
        }
        Ok(self.stdout.trim_end().to_string())
    }
}

/// Run `git <args>` in `cwd` and capture its output
///
/// Only a failure to spawn git is an error here; callers decide what a
/// non-zero exit means.
pub(crate) fn run<I, S>(cwd: &Path, args: I) -> Result<GitOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();
    let command = render(&args);

    debug!(%command, cwd = %cwd.display(), "Running git command");

    let output = Command::new("git")
        .args(&args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Other(format!("Failed to run `{}`: {}", command, e)))?;

    Ok(GitOutput {
        command,
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run `git <args>` in `cwd`, failing on a non-zero exit
pub(crate) fn run_checked<I, S>(cwd: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run(cwd, args)?.check()
}

fn render(args: &[OsString]) -> String {
    let mut rendered = String::from("git");
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
