//! Core types shared by the checks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Severity a diagnostic is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// A finding from a tool or the line-length scan.
    Warn,
    /// A tool could not be executed or exited with an error.
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Warn => write!(f, "warn"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A single normalized line of tool output or scanner finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Something that happened during a run, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Top level progress, e.g. switching platforms.
    Info(String),
    /// Progress within the current platform, e.g. starting a tool.
    Step(String),
    Diagnostic(Diagnostic),
}

/// Files grouped by the directory they were found in.
///
/// Directories iterate in path order; files within a directory keep the
/// order the walk visited them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    dirs: BTreeMap<PathBuf, Vec<String>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file name to the bucket for `dir`.
    pub fn push(&mut self, dir: impl Into<PathBuf>, name: impl Into<String>) {
        self.dirs.entry(dir.into()).or_default().push(name.into());
    }

    /// File names recorded for `dir`.
    pub fn get(&self, dir: &Path) -> Option<&[String]> {
        self.dirs.get(dir).map(Vec::as_slice)
    }

    /// Iterate over directory buckets.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.dirs
            .iter()
            .map(|(dir, files)| (dir.as_path(), files.as_slice()))
    }

    /// Full paths of every file in a bucket, in bucket order.
    pub fn bucket_paths(dir: &Path, files: &[String]) -> Vec<PathBuf> {
        files.iter().map(|f| join(dir, f)).collect()
    }

    /// Full paths of every file in the set.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.iter()
            .flat_map(|(dir, files)| Self::bucket_paths(dir, files))
            .collect()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.iter()
            .any(|(dir, files)| files.iter().any(|f| join(dir, f) == path))
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// `dir/name`, without a leading `./` when `dir` is the current directory.
fn join(dir: &Path, name: &str) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// The three disjoint sets a tree is classified into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSets {
    pub source: FileSet,
    pub test: FileSet,
    pub other: FileSet,
}

impl FileSets {
    /// Source and test sets: everything the Go toolchain compiles.
    pub fn code(&self) -> [&FileSet; 2] {
        [&self.source, &self.test]
    }

    /// All three sets.
    pub fn all(&self) -> [&FileSet; 3] {
        [&self.source, &self.test, &self.other]
    }

    pub fn file_count(&self) -> usize {
        self.all().iter().map(|s| s.file_count()).sum()
    }
}
