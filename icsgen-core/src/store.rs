//! Writing .ics documents to the output directory.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_FILENAME;
use crate::error::{IcsGenError, IcsGenResult};

/// Turn user input into a filename: blank gives `event.ics`, and `.ics` is
/// appended unless already present.
pub fn normalize_filename(input: &str) -> String {
    let name = input.trim();
    if name.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    if name.ends_with(".ics") {
        name.to_string()
    } else {
        format!("{name}.ics")
    }
}

/// Write `content` to `dir/filename`, creating `dir` if needed.
///
/// An existing file at that path is overwritten without warning.
pub fn save_ics(dir: &Path, filename: &str, content: &str) -> IcsGenResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| IcsGenError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(normalize_filename(filename));
    std::fs::write(&path, content).map_err(|source| IcsGenError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = content.len(), "saved event file");
    Ok(path)
}
