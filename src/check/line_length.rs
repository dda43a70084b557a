//! In-process scan for lines longer than a column threshold.
//!
//! Tabs count as four columns and lengths are measured in characters, not
//! bytes. Some lines are allowed to run long:
//!
//! - `//go:` compiler directives
//! - struct fields whose tag block ends the line, e.g.
//!   ``Name string `json:"name" yaml:"name"` ``
//!
//! Everything after a `// Code generated ... DO NOT EDIT.` marker is
//! ignored.

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{Diagnostic, FileSet};

/// Columns a tab expands to.
const TAB: &str = "    ";

/// Prefix of a compiler directive comment.
const DIRECTIVE_PREFIX: &str = "//go:";

lazy_static! {
    static ref GENERATED: Regex =
        Regex::new(r"^//\sCode\sgenerated\s.*\sDO\sNOT\sEDIT\.$").unwrap();

    static ref STRUCT_TAGS: Regex =
        Regex::new(r#"`(?:[A-Za-z0-9_.-]+:"[^"]*"\s*)+`\s*$"#).unwrap();
}

/// Scan every file of the given sets and report lines over `threshold`.
///
/// Files are scanned in parallel but results come back in set order,
/// directory order, then file order.
pub fn scan_lines(threshold: usize, sets: &[&FileSet]) -> Vec<Diagnostic> {
    let files: Vec<PathBuf> = sets.iter().flat_map(|set| set.paths()).collect();

    files
        .par_iter()
        .map(|path| scan_file(threshold, path))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Scan a single file.
///
/// Failing to open or read the file produces a diagnostic rather than an
/// error; anything found before a read failure is kept. Bytes that are not
/// valid UTF-8 are decoded lossily and the scan goes on.
pub fn scan_file(threshold: usize, path: &Path) -> Vec<Diagnostic> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return vec![read_failure(path, &e)],
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut lno = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                out.push(read_failure(path, &e));
                break;
            }
        }
        lno += 1;

        // Invalid UTF-8 is measured as replacement characters, not an error.
        let line = String::from_utf8_lossy(trim_newline(&buf)).replace('\t', TAB);

        if GENERATED.is_match(&line) {
            break;
        }

        if is_exempt(&line) {
            continue;
        }

        let len = line.chars().count();
        if len > threshold {
            out.push(Diagnostic::warn(format!(
                "{}:{} ({}) {}",
                path.display(),
                lno,
                len,
                line
            )));
        }
    }

    out
}

fn trim_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Lines allowed to exceed the threshold.
fn is_exempt(line: &str) -> bool {
    line.starts_with(DIRECTIVE_PREFIX) || STRUCT_TAGS.is_match(line)
}

fn read_failure(path: &Path, e: &std::io::Error) -> Diagnostic {
    Diagnostic::warn(format!("failed to read {}: {}", path.display(), e))
}
