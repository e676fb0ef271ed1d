//! Operator interaction seam
//!
//! The lifecycle controller never renders menus itself. It asks a [`Console`]
//! to present choices and reports progress through it, so the terminal
//! frontend and tests can supply their own implementations.

use crate::Result;

/// Interactive capabilities the lifecycle controller relies on
pub trait Console {
    /// Present labeled choices under `title`
    ///
    /// Returns the selected index, or `None` when the menu was dismissed.
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>>;

    /// Ask a yes/no question
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Report a progress line
    fn info(&mut self, message: &str);

    /// Report a non-fatal problem
    fn warn(&mut self, message: &str);
}
