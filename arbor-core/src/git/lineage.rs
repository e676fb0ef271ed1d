//! Parent-branch lineage stored in `branch.<name>.description`

use super::cli;
use super::repo::GitRepo;
use crate::Result;

const PARENT_PREFIX: &str = "Parent branch: ";

/// Render the description value recording `parent`
pub fn format_parent_record(parent: &str) -> String {
    format!("{PARENT_PREFIX}{parent}")
}

/// Extract the parent name from a description value
///
/// Anything that is empty or lacks the prefix is treated as "no parent".
pub fn parse_parent_record(description: &str) -> Option<String> {
    let parent = description.trim().strip_prefix(PARENT_PREFIX)?.trim();
    (!parent.is_empty()).then(|| parent.to_string())
}

impl GitRepo {
    /// Record `parent` as the branch `branch` was forked from, replacing any prior value
    pub fn record_parent(&self, branch: &str, parent: &str) -> Result<()> {
        cli::run_checked(
            self.root(),
            [
                "config",
                &format!("branch.{branch}.description"),
                &format_parent_record(parent),
            ],
        )?;
        Ok(())
    }

    /// The recorded parent of `branch`, if one was recorded
    pub fn read_parent(&self, branch: &str) -> Result<Option<String>> {
        let output = cli::run(
            self.root(),
            ["config", &format!("branch.{branch}.description")],
        )?;
        if !output.success() {
            return Ok(None);
        }
        Ok(parse_parent_record(&output.stdout))
    }
}
