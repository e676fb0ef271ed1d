//! Throwaway repositories and a scripted console for tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::config::Config;
use crate::console::Console;
use crate::git::GitRepo;
use crate::lifecycle::Lifecycle;
use crate::Result;

/// A git repository at `<tmp>/project` with one commit on `main`
pub struct TestRepo {
    _dir: TempDir,
    /// Canonical temp directory; worktrees land in `<base>/project-worktrees`
    pub base: PathBuf,
    /// Main repository working directory
    pub root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let base = std::fs::canonicalize(dir.path()).expect("canonicalize temp dir");
        let root = base.join("project");
        std::fs::create_dir_all(&root).expect("create repo dir");

        let repo = Self {
            _dir: dir,
            base,
            root,
        };
        repo.git(&repo.root, &["init", "--quiet", "-b", "main"]);
        repo.git(&repo.root, &["config", "user.name", "Arbor Test"]);
        repo.git(&repo.root, &["config", "user.email", "arbor@example.com"]);
        repo.git(&repo.root, &["config", "commit.gpgsign", "false"]);
        repo.commit_file(&repo.root, "README.md", "# project\n");
        repo
    }

    /// Run git in `cwd`, panicking on failure, and return trimmed stdout
    pub fn git(&self, cwd: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Write `name` under `cwd` and commit it on whatever is checked out there
    pub fn commit_file(&self, cwd: &Path, name: &str, contents: &str) {
        std::fs::write(cwd.join(name), contents).expect("write file");
        self.git(cwd, &["add", name]);
        self.git(cwd, &["commit", "--quiet", "-m", &format!("Add {name}")]);
    }

    /// Create a bare repository and register it as `origin`
    pub fn add_origin(&self) -> PathBuf {
        let origin = self.base.join("origin.git");
        self.git(&self.base, &["init", "--quiet", "--bare", origin.to_str().unwrap()]);
        self.git(&self.root, &["remote", "add", "origin", origin.to_str().unwrap()]);
        origin
    }

    pub fn open(&self) -> GitRepo {
        GitRepo::open(&self.root).expect("open test repo")
    }

    /// Controller invoked from `cwd` with default configuration
    pub fn lifecycle_at(&self, cwd: &Path, console: ScriptedConsole) -> Lifecycle<ScriptedConsole> {
        let repo = GitRepo::open(cwd).expect("open test repo");
        Lifecycle::new(repo, Config::default(), console, cwd)
    }

    /// Controller invoked from the main repository root
    pub fn lifecycle(&self, console: ScriptedConsole) -> Lifecycle<ScriptedConsole> {
        self.lifecycle_at(&self.root, console)
    }

    /// Planned worktree path for `branch`
    pub fn worktree_path(&self, branch: &str) -> PathBuf {
        self.base.join("project-worktrees").join(branch)
    }

    pub fn branch_exists(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["show-ref", "--verify", "--quiet", &format!("refs/heads/{branch}")])
            .current_dir(&self.root)
            .status()
            .expect("run git")
            .success()
    }
}

/// Console double answering from queues and recording every line
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    pub selections: VecDeque<Option<usize>>,
    pub confirmations: VecDeque<bool>,
    pub lines: Vec<String>,
    /// Titles and items of every menu shown
    pub menus: Vec<(String, Vec<String>)>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selecting(mut self, choice: Option<usize>) -> Self {
        self.selections.push_back(choice);
        self
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    pub fn printed(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

impl Console for ScriptedConsole {
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        self.menus.push((title.to_string(), items.to_vec()));
        Ok(self.selections.pop_front().flatten())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }

    fn info(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.lines.push(format!("Warning: {message}"));
    }
}
