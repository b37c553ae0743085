//! Error types for icsgen.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or saving an event document.
#[derive(Error, Debug)]
pub enum IcsGenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for icsgen operations.
pub type IcsGenResult<T> = Result<T, IcsGenError>;
