//! Branch mutations

use super::cli;
use super::repo::GitRepo;
use crate::Result;

impl GitRepo {
    /// Create `branch` from the current checkout and switch to it
    pub fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        cli::run_checked(self.checkout(), ["checkout", "-b", branch])?;
        Ok(())
    }

    /// Switch the current checkout back to the previously checked-out ref
    pub fn checkout_previous(&self) -> Result<()> {
        cli::run_checked(self.checkout(), ["checkout", "-"])?;
        Ok(())
    }

    /// Delete a local branch
    ///
    /// Without `force`, git itself refuses to drop a branch it considers unmerged.
    pub fn delete_branch(&self, branch: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        cli::run_checked(self.root(), ["branch", flag, branch])?;
        Ok(())
    }
}
