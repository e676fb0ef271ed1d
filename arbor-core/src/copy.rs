//! Best-effort seeding of new worktrees with untracked scratch paths
//!
//! Build output and similar directories are not carried by `git worktree add`.
//! Copying them is a convenience: individual failures are collected and
//! reported, never fatal, and files that vanish mid-copy are skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::git::GitRepo;

/// A file or directory that could not be copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a best-effort copy
#[derive(Debug, Default)]
pub struct CopyReport {
    /// Number of files (and symlinks) copied
    pub copied: usize,
    /// Per-path failures, in walk order
    pub failures: Vec<CopyFailure>,
}

impl CopyReport {
    /// One warning listing every failure, or `None` when everything copied
    pub fn failure_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut summary = String::from("Some files could not be copied:");
        for failure in &self.failures {
            summary.push_str(&format!("\n  {}: {}", failure.path.display(), failure.error));
        }
        Some(summary)
    }

    fn fail(&mut self, path: &Path, error: impl ToString) {
        self.failures.push(CopyFailure {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }
}

/// Copy each of `paths` (relative to `source`) into `target` if present and untracked
///
/// Paths git tracks in the source checkout are left to the worktree checkout.
pub fn copy_untracked_paths(
    repo: &GitRepo,
    source: &Path,
    target: &Path,
    paths: &[String],
) -> CopyReport {
    let mut report = CopyReport::default();

    for relative in paths {
        let src = source.join(relative);
        if fs::symlink_metadata(&src).is_err() {
            continue;
        }

        match repo.is_tracked(source, relative) {
            Ok(true) => {
                debug!(path = %relative, "Skipping tracked path");
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                report.fail(&src, e);
                continue;
            }
        }

        copy_path_best_effort(&src, &target.join(relative), &mut report);
    }

    report
}

/// Copy a file, symlink or directory tree from `src` to `dst`, recording failures
pub fn copy_path_best_effort(src: &Path, dst: &Path, report: &mut CopyReport) {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) {
                    continue;
                }
                let path = err.path().unwrap_or(src).to_path_buf();
                report.fail(&path, err);
                continue;
            }
        };

        let relative = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
        let dest = if relative.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(relative)
        };

        if entry.file_type().is_dir() {
            if let Err(e) = fs::create_dir_all(&dest) {
                report.fail(entry.path(), e);
            }
        } else {
            copy_file(entry.path(), &dest, entry.path_is_symlink(), report);
        }
    }
}

fn copy_file(src: &Path, dst: &Path, is_symlink: bool, report: &mut CopyReport) {
    if let Some(parent) = dst.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            report.fail(src, e);
            return;
        }
    }

    let result = if is_symlink {
        copy_symlink(src, dst)
    } else {
        fs::copy(src, dst).map(|_| preserve_mtime(src, dst))
    };

    match result {
        Ok(()) => report.copied += 1,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %src.display(), "Source vanished during copy");
        }
        Err(e) => report.fail(src, e),
    }
}

// Incremental build tools compare timestamps, so copies keep the source mtime.
// `fs::copy` carries read-only permission bits over, so the handle is opened
// for reading; the owner may still set times through it.
fn preserve_mtime(src: &Path, dst: &Path) {
    let result = fs::metadata(src)
        .and_then(|meta| meta.modified())
        .and_then(|modified| fs::File::open(dst)?.set_modified(modified));
    if let Err(e) = result {
        debug!(path = %dst.display(), error = %e, "Could not preserve mtime");
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
