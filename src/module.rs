//! Go module root detection.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MODULE_MARKER: &str = "go.mod";

/// Nearest directory at or above `start` that contains a `go.mod`.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        debug!("Checking {} for {}", dir.display(), MODULE_MARKER);
        let marker = dir.join(MODULE_MARKER);
        if marker.is_file() {
            debug!("Found {}", marker.display());
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// Change into the module root above the working directory, if there is one.
///
/// Returns whether a module root was found.
pub fn enter_root() -> io::Result<bool> {
    let cwd = std::env::current_dir()?;
    match find_root(&cwd) {
        Some(root) => {
            std::env::set_current_dir(root)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
