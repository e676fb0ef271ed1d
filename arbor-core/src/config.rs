//! Configuration management for arbor
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`ARBOR_REMOTE`; `SHELL` only when the file names no shell)
//! 3. Config file (`~/.config/arbor/config.toml`, or `ARBOR_CONFIG`)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Shell used when neither the config file nor `SHELL` names one
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Workspace launch and worktree seeding settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Command tokens run inside the shell before it becomes interactive
    pub command: Vec<String>,

    /// Untracked paths, relative to the invoking directory, copied into new worktrees
    pub copy_untracked: Vec<String>,

    /// Shell to hand off to
    pub shell: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            copy_untracked: vec!["DerivedData".to_string()],
            shell: None,
        }
    }
}

/// Git-related settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote consulted for the pushed-tip safety check
    pub remote: String,

    /// Branches tried, in order, when a branch has no recorded parent
    pub main_branch_candidates: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            main_branch_candidates: vec![
                "main".to_string(),
                "master".to_string(),
                "develop".to_string(),
            ],
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Workspace configuration
    pub workspace: WorkspaceConfig,

    /// Git configuration
    pub git: GitConfig,
}

impl Config {
    /// Load configuration from `ARBOR_CONFIG` or the default config file location
    ///
    /// Returns default config if the file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// The config file in effect: `ARBOR_CONFIG` if set, else the default path
    pub fn config_path() -> Option<PathBuf> {
        match std::env::var_os("ARBOR_CONFIG") {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::default_config_path(),
        }
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/arbor/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("arbor").join("config.toml"))
    }

    /// Apply environment variable overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Supported variables:
    /// - SHELL: shell to hand off to, unless the config file names one
    /// - ARBOR_REMOTE: remote used for the pushed-tip check
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.workspace.shell.is_none() {
            self.workspace.shell = lookup("SHELL").filter(|s| !s.trim().is_empty());
        }

        if let Some(remote) = lookup("ARBOR_REMOTE").filter(|s| !s.trim().is_empty()) {
            self.git.remote = remote;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, remote: Option<String>) -> Self {
        if let Some(remote) = remote {
            self.git.remote = remote;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(remote: Option<String>) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(remote))
    }

    /// The shell to exec into
    pub fn shell(&self) -> &str {
        self.workspace.shell.as_deref().unwrap_or(DEFAULT_SHELL)
    }
}
