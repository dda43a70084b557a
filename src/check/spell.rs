//! Whole-tree spell checking with codespell.
//!
//! misspell runs per directory like any other file-group tool; codespell
//! walks the tree itself and is only available on Linux and macOS.

use thiserror::Error;

use super::platform::host_goos;
use super::CommandExecutor;

pub const CODESPELL: &str = "codespell";

/// Globs codespell always skips, on top of the user's skip list.
pub const SKIP_GLOBS: &[&str] = &[
    ".git*", "*.db", "*.der", "*.dll", "*.exe", "*.drawio", "*.gif", "*.gz", "*.jar", "*.jpeg",
    "*.jpg", "*.pdf", "*.pem", "*.png", "*.so", "*.tar", "*.tgz", "*.xz", "*.zip", "go.mod",
    "go.sum",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpellError {
    #[error("codespell not found in PATH")]
    NotFound,
    #[error("unsupported OS: {0}")]
    UnsupportedOs(String),
}

/// Whether codespell can run on `goos`.
pub fn is_supported(goos: &str) -> bool {
    matches!(goos, "darwin" | "linux")
}

/// Arguments for a codespell run over the working directory.
///
/// Ignore words are lowercased since codespell matches them that way.
pub fn codespell_argv(ignore: &[String], skip: &[String]) -> Vec<String> {
    let mut argv = vec![CODESPELL.to_string(), "-d".to_string(), "-f".to_string()];

    if !ignore.is_empty() {
        argv.push("-L".to_string());
        argv.push(ignore.join(",").to_lowercase());
    }

    let skip: Vec<&str> = skip
        .iter()
        .map(String::as_str)
        .chain(SKIP_GLOBS.iter().copied())
        .collect();
    argv.push("-S".to_string());
    argv.push(skip.join(","));

    argv
}

/// Build the codespell command if it can run here.
pub fn codespell_command<E: CommandExecutor>(
    executor: &E,
    ignore: &[String],
    skip: &[String],
) -> Result<Vec<String>, SpellError> {
    let goos = host_goos();
    if !is_supported(goos) {
        return Err(SpellError::UnsupportedOs(goos.to_string()));
    }
    if !executor.is_available(CODESPELL) {
        return Err(SpellError::NotFound);
    }
    Ok(codespell_argv(ignore, skip))
}
