//! Interactive terminal console backed by dialoguer

use arbor_core::{Console, Error, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// Console that prompts on the controlling terminal
#[derive(Default)]
pub struct TerminalConsole {
    theme: ColorfulTheme,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for TerminalConsole {
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        Ok(answer.unwrap_or(false))
    }

    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn warn(&mut self, message: &str) {
        eprintln!("Warning: {message}");
    }
}
