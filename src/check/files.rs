//! Classification of a source tree into source, test and other files.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{FileSet, FileSets};

/// Version control metadata directory, never descended into.
pub const VCS_DIR: &str = ".git";

/// Suffix marking a Go test file.
pub const TEST_SUFFIX: &str = "_test.go";

/// Suffix marking a Go source file.
pub const SOURCE_SUFFIX: &str = ".go";

lazy_static! {
    /// Binaries, archives, certificates and other files no tool should see.
    static ref ALWAYS_IGNORE: Regex = Regex::new(
        r"(?i)(\.(db|der|dll|drawio|exe|gif|gz|jar|jpe?g|pdf|pem|png|so|tar|tgz|xz|zip)|^go\.sum)$"
    )
    .unwrap();
}

/// Walk `root` and bucket every file into exactly one of the three sets.
///
/// Directories named [`VCS_DIR`] or listed in `prune` are skipped along
/// with everything beneath them. Files listed in `prune` or matching the
/// always-ignore pattern are dropped. Walk errors are swallowed, so a root
/// that cannot be read yields empty sets.
pub fn classify<P: AsRef<Path>>(root: P, prune: &[String]) -> FileSets {
    let mut sets = FileSets::default();

    let walker = WalkDir::new(root.as_ref())
        .into_iter()
        .filter_entry(|e| !is_pruned_dir(e, prune));

    for entry in walker.filter_map(Result::ok) {
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if is_ignored(&name) || prune.iter().any(|p| *p == name) {
            continue;
        }

        let dir = parent_dir(entry.path());
        if name.ends_with(TEST_SUFFIX) {
            sets.test.push(dir, name);
        } else if name.ends_with(SOURCE_SUFFIX) {
            sets.source.push(dir, name);
        } else {
            sets.other.push(dir, name);
        }
    }

    sets
}

/// Whether a file name matches the always-ignore pattern.
pub fn is_ignored(name: &str) -> bool {
    ALWAYS_IGNORE.is_match(name)
}

fn is_pruned_dir(entry: &DirEntry, prune: &[String]) -> bool {
    // The root is what the user asked for, whatever it is called.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == VCS_DIR || prune.iter().any(|p| *p == name)
}

/// Parent directory with any leading `./` removed; `.` for top level files.
fn parent_dir(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    match parent.strip_prefix(".") {
        Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rest) => rest.to_path_buf(),
        Err(_) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Err(_) => parent.to_path_buf(),
    }
}
