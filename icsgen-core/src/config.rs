//! icsgen configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{IcsGenError, IcsGenResult};

#[cfg(windows)]
static DEFAULT_OUTPUT_DIR: &str = r"C:\temp";
#[cfg(not(windows))]
static DEFAULT_OUTPUT_DIR: &str = "/tmp/ics";

pub static DEFAULT_TIMEZONE: &str = "Africa/Kampala";
pub static DEFAULT_FILENAME: &str = "event.ics";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

/// Configuration at ~/.config/icsgen/config.toml
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IcsGenConfig {
    /// Where .ics files are written. `~` is expanded.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    #[serde(default = "default_filename")]
    pub default_filename: String,
}

impl Default for IcsGenConfig {
    fn default() -> Self {
        IcsGenConfig {
            output_dir: default_output_dir(),
            default_timezone: default_timezone(),
            default_filename: default_filename(),
        }
    }
}

impl IcsGenConfig {
    pub fn config_path() -> IcsGenResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IcsGenError::Config("Could not determine config directory".into()))?
            .join("icsgen");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path.
    pub fn load() -> IcsGenResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults for anything not set.
    pub fn load_from(path: &Path) -> IcsGenResult<Self> {
        let config: IcsGenConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| IcsGenError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| IcsGenError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> IcsGenResult<()> {
        let contents = format!(
            "\
# icsgen configuration

# Where .ics files are written:
# output_dir = '{DEFAULT_OUTPUT_DIR}'

# Timezone used when the prompt is left blank:
# default_timezone = \"{DEFAULT_TIMEZONE}\"

# Filename used when the prompt is left blank:
# default_filename = \"{DEFAULT_FILENAME}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                IcsGenError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| IcsGenError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
