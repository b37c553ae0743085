//! Console I/O behind a trait so the prompt flow can run from a script.

use std::io;

use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

pub trait Prompter {
    /// Ask a question and return the trimmed answer. Blank answers are allowed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Informational output: menus, confirmations.
    fn say(&mut self, message: &str);

    fn success(&mut self, message: &str);

    /// Recoverable problems, such as a re-prompt hint.
    fn warn(&mut self, message: &str);
}

/// Prompts on the real terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let input: String = Input::new()
            .with_prompt(prompt)
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        Ok(input.trim().to_string())
    }

    fn say(&mut self, message: &str) {
        println!("{message}");
    }

    fn success(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn warn(&mut self, message: &str) {
        eprintln!("  {}", message.red());
    }
}

/// True if the error came from the user interrupting a prompt (Ctrl-C).
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return io_err.kind() == io::ErrorKind::Interrupted;
        }
        matches!(
            cause.downcast_ref::<dialoguer::Error>(),
            Some(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted
        )
    })
}

#[cfg(test)]
pub use scripted::ScriptedPrompter;
