//! Git repository detection and read-only queries

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use super::cli;
use crate::{Error, Result};

/// Handle on the repository the operator invoked arbor from
///
/// Holds only locations; every query asks git again.
pub struct GitRepo {
    /// Working directory of the main repository
    root: PathBuf,
    /// Toplevel of the checkout the operator is standing in (main or linked worktree)
    checkout: PathBuf,
    /// Remote consulted for pushed-tip checks
    remote: String,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("root", &self.root)
            .field("checkout", &self.checkout)
            .field("remote", &self.remote)
            .finish()
    }
}

impl GitRepo {
    /// Open the git repository containing `path`
    ///
    /// This searches upward from `path`. When `path` is inside a linked
    /// worktree, [`GitRepo::root`] still resolves to the main repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::NotARepository(path.to_path_buf())
            } else {
                Error::Other(format!("Git error: {}", e))
            }
        })?;

        let checkout = repo
            .workdir()
            .ok_or_else(|| Error::Config("Bare repositories are not supported".to_string()))?;
        let checkout = canonical(checkout);

        let root = common_root_from_git_common_dir(&git_common_dir(repo.path()))
            .map(|root| canonical(&root))
            .unwrap_or_else(|| checkout.clone());

        debug!(root = %root.display(), checkout = %checkout.display(), "Opened repository");

        Ok(Self {
            root,
            checkout,
            remote: "origin".to_string(),
        })
    }

    /// Use `remote` for pushed-tip checks
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Main repository working directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Toplevel of the checkout arbor was invoked from
    pub fn checkout(&self) -> &Path {
        &self.checkout
    }

    /// Remote consulted for pushed-tip checks
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Directory name of the main repository
    pub fn repo_name(&self) -> String {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repo")
            .to_string()
    }

    /// Whether `refs/heads/<name>` exists
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let output = cli::run(
            &self.root,
            ["show-ref", "--verify", "--quiet", &format!("refs/heads/{name}")],
        )?;
        Ok(output.success())
    }

    /// Short name of the branch checked out where arbor was invoked
    ///
    /// Returns `None` on a detached HEAD.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let name = cli::run_checked(&self.checkout, ["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = name.trim();
        if name.is_empty() || name == "HEAD" {
            return Ok(None);
        }
        Ok(Some(name.to_string()))
    }

    /// Guess the repository's main branch
    ///
    /// The first of `candidates` that exists locally wins; otherwise the first
    /// remote-tracking branch (other than a remote's `HEAD`) by its name
    /// without the remote prefix.
    pub fn main_branch_guess(&self, candidates: &[String]) -> Result<Option<String>> {
        for candidate in candidates {
            if self.branch_exists(candidate)? {
                return Ok(Some(candidate.clone()));
            }
        }

        let refs = cli::run_checked(
            &self.root,
            ["for-each-ref", "--format=%(refname)", "refs/remotes"],
        )?;
        Ok(first_remote_branch(&refs))
    }

    /// Commit hash of the local branch, or `None` if it does not exist
    pub fn local_tip(&self, branch: &str) -> Result<Option<String>> {
        let output = cli::run(
            &self.root,
            [
                "rev-parse",
                "--verify",
                "--quiet",
                &format!("refs/heads/{branch}^{{commit}}"),
            ],
        )?;
        if !output.success() {
            return Ok(None);
        }
        let tip = output.stdout.trim();
        Ok((!tip.is_empty()).then(|| tip.to_string()))
    }

    /// Commit hash of `branch` on the configured remote, or `None`
    ///
    /// An unreachable or unconfigured remote counts as "no remote tip".
    pub fn remote_tip(&self, branch: &str) -> Result<Option<String>> {
        let output = cli::run(&self.root, ["ls-remote", "--heads", &self.remote, branch])?;
        if !output.success() {
            debug!(
                remote = %self.remote,
                stderr = %output.stderr.trim(),
                "ls-remote failed, treating branch as not pushed"
            );
            return Ok(None);
        }
        Ok(parse_ls_remote(&output.stdout, branch))
    }

    /// Whether the local tip of `branch` equals its tip on the remote
    pub fn is_pushed(&self, branch: &str) -> Result<bool> {
        let Some(local) = self.local_tip(branch)? else {
            return Ok(false);
        };
        let Some(remote) = self.remote_tip(branch)? else {
            return Ok(false);
        };
        Ok(local == remote)
    }

    /// Whether `branch` is listed by `git branch --merged <target>`
    ///
    /// Runs from `from`, which should be the branch's own worktree. A target
    /// that does not resolve to a commit means "not merged".
    pub fn is_merged(&self, branch: &str, target: &str, from: &Path) -> Result<bool> {
        let resolves = cli::run(
            from,
            ["rev-parse", "--verify", "--quiet", &format!("{target}^{{commit}}")],
        )?
        .success();
        if !resolves {
            tracing::warn!(merge_target = target, "Merge target does not resolve to a commit");
            return Ok(false);
        }

        let merged = cli::run_checked(from, ["branch", "--merged", target])?;
        let found = merged_branches(&merged).any(|name| name == branch);
        Ok(found)
    }

    /// Whether the working tree at `path` has modified, staged or untracked entries
    pub fn has_uncommitted_changes(&self, path: &Path) -> Result<bool> {
        let status = cli::run_checked(path, ["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    /// Whether git tracks anything at `relative` under `cwd`
    pub fn is_tracked(&self, cwd: &Path, relative: &str) -> Result<bool> {
        let files = cli::run_checked(cwd, ["ls-files", "--", relative])?;
        Ok(!files.trim().is_empty())
    }
}

/// Common dir shared by all worktrees, given one worktree's git dir
///
/// A linked worktree's git dir (`.git/worktrees/<name>`) holds a `commondir`
/// file pointing back at the main `.git`, usually as a relative path.
pub(crate) fn git_common_dir(git_dir: &Path) -> PathBuf {
    match std::fs::read_to_string(git_dir.join("commondir")) {
        Ok(contents) if !contents.trim().is_empty() => git_dir.join(contents.trim()),
        _ => git_dir.to_path_buf(),
    }
}

/// The main working directory for a git common dir ending in `.git`
pub(crate) fn common_root_from_git_common_dir(common_dir: &Path) -> Option<PathBuf> {
    let common_dir = canonical(common_dir);
    if common_dir.file_name()? != ".git" {
        return None;
    }
    common_dir.parent().map(Path::to_path_buf)
}

/// Canonicalize, keeping the path as-is when it cannot be resolved
pub(crate) fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn first_remote_branch(refs: &str) -> Option<String> {
    refs.lines()
        .filter_map(|line| line.trim().strip_prefix("refs/remotes/"))
        .filter(|name| !name.ends_with("/HEAD"))
        .find_map(|name| name.split_once('/').map(|(_, branch)| branch.to_string()))
        .filter(|branch| !branch.is_empty())
}

fn parse_ls_remote(output: &str, branch: &str) -> Option<String> {
    let wanted = format!("refs/heads/{branch}");
    output.lines().find_map(|line| {
        let (hash, reference) = line.split_once('\t')?;
        (reference.trim() == wanted).then(|| hash.trim().to_string())
    })
}

/// Branch names from `git branch` output, without `*`/`+` checkout markers
fn merged_branches(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .map(|line| line.trim_start_matches(['*', '+', ' ']).trim())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn test_common_root_from_git_dir() {
        let root = common_root_from_git_common_dir(Path::new("/nonexistent/project/.git"));
        assert_eq!(root, Some(PathBuf::from("/nonexistent/project")));
        assert_eq!(
            common_root_from_git_common_dir(Path::new("/nonexistent/project.git")),
            None
        );
    }

    #[test]
    fn test_git_common_dir_follows_commondir_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let main_git = dir.path().join("project/.git");
        let linked_git = main_git.join("worktrees/side");
        std::fs::create_dir_all(&linked_git).unwrap();
        std::fs::write(linked_git.join("commondir"), "../..\n").unwrap();

        assert_eq!(
            canonical(&git_common_dir(&linked_git)),
            canonical(&main_git)
        );
        assert_eq!(git_common_dir(&main_git), main_git);
    }

    #[test]
    fn test_first_remote_branch_skips_head() {
        let refs = "refs/remotes/origin/HEAD\nrefs/remotes/origin/trunk\nrefs/remotes/origin/zeta\n";
        assert_eq!(first_remote_branch(refs), Some("trunk".to_string()));
        assert_eq!(
            first_remote_branch("refs/remotes/upstream/feature/x\n"),
            Some("feature/x".to_string())
        );
        assert_eq!(first_remote_branch(""), None);
    }

    #[test]
    fn test_parse_ls_remote_exact_match() {
        let output = "1111\trefs/heads/team/feature\n2222\trefs/heads/feature\n";
        assert_eq!(parse_ls_remote(output, "feature"), Some("2222".to_string()));
        assert_eq!(parse_ls_remote(output, "other"), None);
        assert_eq!(parse_ls_remote("", "feature"), None);
    }

    #[test]
    fn test_merged_branches_strips_markers() {
        let output = "* feature-x\n+ main\n  other\n";
        let names: Vec<&str> = merged_branches(output).collect();
        assert_eq!(names, vec!["feature-x", "main", "other"]);
    }

    #[test]
    fn test_open_non_git_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = GitRepo::open(dir.path());
        assert!(matches!(result, Err(Error::NotARepository(_))));
    }

    #[test]
    fn test_open_from_subdirectory() {
        let repo = TestRepo::new();
        let sub = repo.root.join("src").join("deep");
        std::fs::create_dir_all(&sub).unwrap();

        let git = GitRepo::open(&sub).unwrap();
        assert_eq!(git.root(), repo.root);
        assert_eq!(git.checkout(), repo.root);
        assert_eq!(git.repo_name(), "project");
    }

    #[test]
    fn test_open_from_linked_worktree_resolves_main_root() {
        let repo = TestRepo::new();
        let linked = repo.base.join("linked");
        repo.git(&repo.root, &["worktree", "add", "-b", "side", linked.to_str().unwrap()]);

        let git = GitRepo::open(&linked).unwrap();
        assert_eq!(git.root(), repo.root);
        assert_eq!(git.checkout(), canonical(&linked));
    }

    #[test]
    fn test_branch_queries() {
        let repo = TestRepo::new();
        let git = repo.open();

        assert!(git.branch_exists("main").unwrap());
        assert!(!git.branch_exists("nope").unwrap());
        assert_eq!(git.current_branch().unwrap(), Some("main".to_string()));
        assert!(git.local_tip("main").unwrap().is_some());
        assert_eq!(git.local_tip("nope").unwrap(), None);
    }

    #[test]
    fn test_current_branch_detached() {
        let repo = TestRepo::new();
        repo.git(&repo.root, &["checkout", "--detach"]);
        assert_eq!(repo.open().current_branch().unwrap(), None);
    }

    #[test]
    fn test_main_branch_guess() {
        let repo = TestRepo::new();
        let git = repo.open();
        let candidates = vec!["master".to_string(), "main".to_string()];
        assert_eq!(
            git.main_branch_guess(&candidates).unwrap(),
            Some("main".to_string())
        );

        let candidates = vec!["trunk".to_string()];
        assert_eq!(git.main_branch_guess(&candidates).unwrap(), None);
    }

    #[test]
    fn test_main_branch_guess_falls_back_to_remote() {
        let repo = TestRepo::new();
        repo.add_origin();
        repo.git(&repo.root, &["push", "origin", "main:release"]);
        repo.git(&repo.root, &["fetch", "origin"]);

        let candidates = vec!["trunk".to_string()];
        assert_eq!(
            repo.open().main_branch_guess(&candidates).unwrap(),
            Some("release".to_string())
        );
    }

    #[test]
    fn test_remote_tip_without_remote() {
        let repo = TestRepo::new();
        let git = repo.open();
        assert_eq!(git.remote_tip("main").unwrap(), None);
        assert!(!git.is_pushed("main").unwrap());
    }

    #[test]
    fn test_is_pushed() {
        let repo = TestRepo::new();
        repo.add_origin();
        let git = repo.open();

        repo.git(&repo.root, &["push", "origin", "main"]);
        assert!(git.is_pushed("main").unwrap());

        repo.commit_file(&repo.root, "later.txt", "later");
        assert!(!git.is_pushed("main").unwrap());
    }

    #[test]
    fn test_is_merged() {
        let repo = TestRepo::new();
        let git = repo.open();

        repo.git(&repo.root, &["branch", "topic"]);
        assert!(git.is_merged("topic", "main", &repo.root).unwrap());

        repo.git(&repo.root, &["checkout", "topic"]);
        repo.commit_file(&repo.root, "topic.txt", "topic");
        assert!(!git.is_merged("topic", "main", &repo.root).unwrap());
        assert!(!git.is_merged("topic", "missing-target", &repo.root).unwrap());
    }

    #[test]
    fn test_has_uncommitted_changes() {
        let repo = TestRepo::new();
        let git = repo.open();
        assert!(!git.has_uncommitted_changes(&repo.root).unwrap());

        std::fs::write(repo.root.join("scratch.txt"), "wip").unwrap();
        assert!(git.has_uncommitted_changes(&repo.root).unwrap());
    }

    #[test]
    fn test_has_uncommitted_changes_missing_dir_is_error() {
        let repo = TestRepo::new();
        let missing = repo.base.join("gone");
        let result = repo.open().has_uncommitted_changes(&missing);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_tracked() {
        let repo = TestRepo::new();
        let git = repo.open();
        assert!(git.is_tracked(&repo.root, "README.md").unwrap());

        std::fs::create_dir_all(repo.root.join("DerivedData")).unwrap();
        std::fs::write(repo.root.join("DerivedData/out.o"), "obj").unwrap();
        assert!(!git.is_tracked(&repo.root, "DerivedData").unwrap());
    }
}
