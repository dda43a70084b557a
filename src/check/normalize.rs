//! Cleanup of raw tool output into diagnostic lines.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, MAIN_SEPARATOR};

/// Output that means a tool had nothing to do, not that it found anything.
///
/// Matched against the whole output; any match drops all of it.
pub const IGNORABLE_PATTERNS: &[&str] = &[
    r"does not contain main module",
    r"matched no packages",
    r"no Go files in",
    r"error obtaining VCS status",
];

/// Tool labels stripped from the start of each line.
pub const NOISE_PREFIXES: &[&str] = &["vet: "];

lazy_static! {
    static ref IGNORABLE: Vec<Regex> = IGNORABLE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Index of a line to drop unconditionally, e.g. a summary banner.
    pub drop_line: Option<usize>,
}

/// Strips noise from tool output relative to a working directory.
#[derive(Debug, Clone)]
pub struct Normalizer {
    ignorable: Vec<Regex>,
    prefixes: Vec<String>,
}

impl Normalizer {
    /// Normalizer for output produced in `cwd`.
    ///
    /// Without a working directory, absolute paths are left alone.
    pub fn new(cwd: Option<&Path>) -> Self {
        let mut prefixes: Vec<String> = NOISE_PREFIXES.iter().map(|p| p.to_string()).collect();
        prefixes.push(format!(".{}", MAIN_SEPARATOR));
        if let Some(cwd) = cwd {
            prefixes.push(format!("{}{}", cwd.display(), MAIN_SEPARATOR));
        }

        Self {
            ignorable: IGNORABLE.clone(),
            prefixes,
        }
    }

    /// Normalizer for the process working directory.
    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().ok().as_deref())
    }

    /// Add more ignorable patterns on top of the built-in table.
    pub fn with_ignorable(mut self, patterns: impl IntoIterator<Item = Regex>) -> Self {
        self.ignorable.extend(patterns);
        self
    }

    /// Whether `raw` is an expected no-op condition.
    pub fn is_ignorable(&self, raw: &str) -> bool {
        self.ignorable.iter().any(|r| r.is_match(raw))
    }

    pub fn normalize(&self, raw: &str) -> Vec<String> {
        self.normalize_with(raw, NormalizeOptions::default())
    }

    /// Split `raw` into lines and strip each known prefix at most once.
    ///
    /// Line order and duplicates are preserved.
    pub fn normalize_with(&self, raw: &str, opts: NormalizeOptions) -> Vec<String> {
        if raw.is_empty() || self.is_ignorable(raw) {
            return Vec::new();
        }

        raw.lines()
            .enumerate()
            .filter(|(idx, _)| opts.drop_line != Some(*idx))
            .map(|(_, line)| self.strip(line).to_string())
            .collect()
    }

    fn strip<'a>(&self, mut line: &'a str) -> &'a str {
        for prefix in &self.prefixes {
            if let Some(rest) = line.strip_prefix(prefix.as_str()) {
                line = rest;
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        PathBuf::from(format!("{}work{}proj", MAIN_SEPARATOR, MAIN_SEPARATOR))
    }

    #[test]
    fn test_ignorable_output_is_dropped() {
        let n = Normalizer::new(Some(&cwd()));
        assert!(n.normalize("go: warning: \"./...\" matched no packages").is_empty());
        assert!(n
            .normalize("directory prefix . does not contain main module or its selected dependencies")
            .is_empty());
        assert!(n.normalize("").is_empty());
    }

    #[test]
    fn test_strips_cwd_prefix_once() {
        let n = Normalizer::new(Some(&cwd()));
        let root = cwd().display().to_string();
        let raw = format!("{root}{sep}{root}{sep}main.go:3:1: oops", sep = MAIN_SEPARATOR);

        let out = n.normalize(&raw);

        assert_eq!(out, vec![format!("{}{}main.go:3:1: oops", root, MAIN_SEPARATOR)]);
    }

    #[test]
    fn test_strips_prefixes_in_order() {
        let n = Normalizer::new(Some(&cwd()));
        let raw = format!(
            "vet: .{sep}pkg{sep}a.go:1:1: bad\n.{sep}b.go:2: worse",
            sep = MAIN_SEPARATOR
        );

        let out = n.normalize(&raw);

        assert_eq!(
            out,
            vec![
                format!("pkg{}a.go:1:1: bad", MAIN_SEPARATOR),
                "b.go:2: worse".to_string()
            ]
        );
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let n = Normalizer::new(None);
        let out = n.normalize("b\na\nb\r\n");
        assert_eq!(out, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_drop_line_option() {
        let n = Normalizer::new(None);
        let out = n.normalize_with(
            "banner\nfirst\nsecond",
            NormalizeOptions { drop_line: Some(0) },
        );
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn test_extra_ignorable_patterns() {
        let n = Normalizer::new(None).with_ignorable([Regex::new("^nothing to see$").unwrap()]);
        assert!(n.normalize("nothing to see").is_empty());
        assert_eq!(n.normalize("something to see").len(), 1);
    }
}
