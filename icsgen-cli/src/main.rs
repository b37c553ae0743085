mod collect;
mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use icsgen_core::IcsGenConfig;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use utils::tui::{TerminalPrompter, is_interrupted};

#[derive(Parser)]
#[command(name = "icsgen", version)]
#[command(about = "Create .ics calendar event files interactively")]
struct Cli {
    /// Directory to write .ics files to (overrides the config file)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Timezone offered when the prompt is left blank
    #[arg(long)]
    timezone: Option<String>,

    /// Write a commented config file to the default location and exit
    #[arg(long)]
    init_config: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if cli.init_config {
        let path = IcsGenConfig::config_path()?;
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            IcsGenConfig::create_default_config(&path)?;
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let mut config = load_config();
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(tz) = cli.timezone {
        config.default_timezone = tz;
    }

    // Every failure past this point is reported and the process still exits 0.
    match commands::new::run(&mut TerminalPrompter, &config) {
        Ok(()) => {}
        Err(e) if is_interrupted(&e) => {
            println!("\n\n{}", "Operation cancelled by user.".yellow());
        }
        Err(e) => {
            tracing::error!(error = ?e, "event session failed");
            println!("\n{}", format!("An error occurred: {e:#}").red());
        }
    }

    Ok(())
}

/// Logs go to stderr so they never interleave with prompts on stdout.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))?;

    Ok(())
}

/// Load the config file, falling back to defaults if it can't be read.
fn load_config() -> IcsGenConfig {
    match IcsGenConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "using default configuration");
            eprintln!("  {}", format!("{e}; using defaults").yellow());
            IcsGenConfig::default()
        }
    }
}
