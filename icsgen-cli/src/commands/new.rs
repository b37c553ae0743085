use std::path::PathBuf;

use anyhow::{Context, Result};
use icsgen_core::{IcsGenConfig, ics, store};

use crate::collect::collect_event;
use crate::utils::tui::Prompter;

/// Create events until the user says they're done.
pub fn run<P: Prompter>(p: &mut P, config: &IcsGenConfig) -> Result<()> {
    loop {
        create_event(p, config)?;

        let another = p.ask("\nCreate another event? (y/n)")?;
        if !another.eq_ignore_ascii_case("y") {
            p.say("\nGoodbye!");
            return Ok(());
        }

        p.say(&format!("\n{}\n", "=".repeat(50)));
    }
}

/// Collect, render and save one event.
///
/// A failed save is reported and returns `Ok(None)`; the session carries on.
fn create_event<P: Prompter>(p: &mut P, config: &IcsGenConfig) -> Result<Option<PathBuf>> {
    let event = collect_event(p, config)?;
    let content = ics::generate_ics(&event).context("Failed to build calendar file")?;

    let filename = p.ask(&format!(
        "\nFilename for the ICS file [default: {}]",
        config.default_filename
    ))?;
    let filename = if filename.is_empty() {
        config.default_filename.as_str()
    } else {
        filename.as_str()
    };

    let dir = config.output_path();
    match store::save_ics(&dir, filename, &content) {
        Ok(path) => {
            p.success(&format!("\n✓ ICS file saved as: {}", path.display()));
            p.say("\nYou can now import the file into your calendar application.");
            p.say(&format!("The file has been saved in {}.", dir.display()));
            Ok(Some(path))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to save event file");
            p.warn(&format!("Error saving file: {e}"));
            Ok(None)
        }
    }
}
