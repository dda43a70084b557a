//! Run configuration.
//!
//! Settings come from command-line flags layered over a JSON rc file kept in
//! the user's config directory (`~/.config/gocomplain/rc` on Linux). A flag
//! left at its default takes the file's value, list values from both are
//! combined, and `quiet` is set if either asks for it.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::check::{Platform, Tool};

pub const DEFAULT_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_LENGTH: usize = 70;
pub const DEFAULT_OVER: u32 = 15;
pub const MIN_LENGTH: usize = 70;
pub const MAX_LENGTH: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const CONFIG_FILE: &str = "rc";

/// Location of the rc file, if the platform has a config directory.
static CONFIG_PATH: Lazy<Option<PathBuf>> = Lazy::new(|| {
    ProjectDirs::from("", "", "gocomplain").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
});

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Less than 70? Who hurt you?")]
    LengthTooShort(usize),
    #[error("Greater than 100? You monster!")]
    LengthTooLong(usize),
    #[error("confidence must be between 0 and 1, got {0}")]
    Confidence(f64),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of the rc file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub confidence: f64,
    pub ignore: Vec<String>,
    pub length: usize,
    pub over: u32,
    pub prune: Vec<String>,
    pub quiet: bool,
    pub skip: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            ignore: Vec::new(),
            length: DEFAULT_LENGTH,
            over: DEFAULT_OVER,
            prune: Vec::new(),
            quiet: false,
            skip: Vec::new(),
        }
    }
}

impl FileConfig {
    pub fn default_path() -> Option<&'static Path> {
        CONFIG_PATH.as_deref()
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load the rc file at `path`.
    ///
    /// A missing file is created with the defaults. Failing to create it is
    /// not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                warn!("could not write default config to {}: {}", path.display(), e);
            }
            return Ok(config);
        }

        debug!("reading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, or use the defaults if there is none.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
    }
}

/// Settings given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Flags {
    pub confidence: f64,
    pub ignore: Vec<String>,
    pub length: usize,
    pub over: u32,
    pub prune: Vec<String>,
    pub quiet: bool,
    pub skip: Vec<String>,
    pub cgo: bool,
    pub debug: bool,
    /// Seconds; zero disables the timeout.
    pub timeout: u64,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            ignore: Vec::new(),
            length: DEFAULT_LENGTH,
            over: DEFAULT_OVER,
            prune: Vec::new(),
            quiet: false,
            skip: Vec::new(),
            cgo: false,
            debug: false,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Flags {
    /// Layer these flags over the rc file.
    pub fn merge(mut self, file: &FileConfig) -> Self {
        if self.confidence == DEFAULT_CONFIDENCE {
            self.confidence = file.confidence;
        }
        if self.length == DEFAULT_LENGTH {
            self.length = file.length;
        }
        if self.over == DEFAULT_OVER {
            self.over = file.over;
        }
        self.ignore.extend(file.ignore.iter().cloned());
        self.prune.extend(file.prune.iter().cloned());
        self.skip.extend(file.skip.iter().cloned());
        self.quiet |= file.quiet;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length < MIN_LENGTH {
            return Err(ConfigError::LengthTooShort(self.length));
        }
        if self.length > MAX_LENGTH {
            return Err(ConfigError::LengthTooLong(self.length));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ConfigError::Confidence(self.confidence));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// Split comma-separated list values, dropping empty entries.
pub fn split_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Platforms and tools picked by action words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub platforms: Vec<Platform>,
    pub tools: Vec<Tool>,
    pub removed: Vec<Tool>,
}

impl Selection {
    /// Final platform list: the selection in order without repeats, or the
    /// host if nothing was selected.
    pub fn platforms(&self) -> Vec<Platform> {
        if self.platforms.is_empty() {
            return Platform::host().into_iter().collect();
        }
        dedup(&self.platforms)
    }

    /// Final tool list: the selection (or every tool) in order without
    /// repeats, minus anything removed.
    pub fn tools(&self) -> Vec<Tool> {
        let tools = if self.tools.is_empty() {
            Tool::all()
        } else {
            dedup(&self.tools)
        };
        tools
            .into_iter()
            .filter(|t| !self.removed.contains(t))
            .collect()
    }
}

fn dedup<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub platforms: Vec<Platform>,
    pub tools: Vec<Tool>,
    pub length: usize,
    pub confidence: f64,
    pub over: u32,
    pub ignore: Vec<String>,
    pub skip: Vec<String>,
    pub prune: Vec<String>,
    /// Whether the working directory is a Go module root.
    pub module_root: bool,
    pub cgo: bool,
    pub debug: bool,
    pub quiet: bool,
    pub timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(&Flags::default(), &Selection::default())
    }
}

impl RunConfig {
    pub fn new(flags: &Flags, selection: &Selection) -> Self {
        Self {
            platforms: selection.platforms(),
            tools: selection.tools(),
            length: flags.length,
            confidence: flags.confidence,
            over: flags.over,
            ignore: flags.ignore.clone(),
            skip: flags.skip.clone(),
            prune: flags.prune.clone(),
            module_root: false,
            cgo: flags.cgo,
            debug: flags.debug,
            quiet: flags.quiet,
            timeout: flags.timeout(),
        }
    }

    pub fn module_root(mut self, module_root: bool) -> Self {
        self.module_root = module_root;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_file() {
        let config = FileConfig::parse(r#"{"length": 80, "ignore": ["colour"]}"#).unwrap();
        assert_eq!(config.length, 80);
        assert_eq!(config.ignore, vec!["colour"]);
        assert_eq!(config.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(config.over, DEFAULT_OVER);
        assert!(!config.quiet);
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gocomplain").join("rc");

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(path.exists());

        let written = FileConfig::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, FileConfig::default());
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        fs::write(&path, r#"{"over": 20, "quiet": true}"#).unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.over, 20);
        assert!(config.quiet);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc");
        fs::write(&path, "{not json").unwrap();

        let err = FileConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_merge_defaults_take_file_values() {
        let file = FileConfig {
            confidence: 0.5,
            length: 90,
            over: 25,
            ..FileConfig::default()
        };
        let merged = Flags::default().merge(&file);
        assert_eq!(merged.confidence, 0.5);
        assert_eq!(merged.length, 90);
        assert_eq!(merged.over, 25);
    }

    #[test]
    fn test_merge_explicit_flags_win() {
        let file = FileConfig {
            length: 90,
            over: 25,
            ..FileConfig::default()
        };
        let flags = Flags {
            length: 80,
            over: 10,
            ..Flags::default()
        };
        let merged = flags.merge(&file);
        assert_eq!(merged.length, 80);
        assert_eq!(merged.over, 10);
    }

    #[test]
    fn test_merge_appends_lists_and_ors_quiet() {
        let file = FileConfig {
            ignore: vec!["teh".to_string()],
            prune: vec!["vendor".to_string()],
            skip: vec!["*.md".to_string()],
            quiet: true,
            ..FileConfig::default()
        };
        let flags = Flags {
            ignore: vec!["colour".to_string()],
            ..Flags::default()
        };
        let merged = flags.merge(&file);
        assert_eq!(merged.ignore, vec!["colour", "teh"]);
        assert_eq!(merged.prune, vec!["vendor"]);
        assert_eq!(merged.skip, vec!["*.md"]);
        assert!(merged.quiet);
    }

    #[test]
    fn test_validate_length_bounds() {
        let short = Flags {
            length: 69,
            ..Flags::default()
        };
        let err = short.validate().unwrap_err();
        assert_eq!(err.to_string(), "Less than 70? Who hurt you?");

        let long = Flags {
            length: 101,
            ..Flags::default()
        };
        let err = long.validate().unwrap_err();
        assert_eq!(err.to_string(), "Greater than 100? You monster!");

        for length in [70, 100] {
            let ok = Flags {
                length,
                ..Flags::default()
            };
            assert!(ok.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_confidence() {
        let flags = Flags {
            confidence: 1.5,
            ..Flags::default()
        };
        assert!(matches!(flags.validate(), Err(ConfigError::Confidence(_))));
    }

    #[test]
    fn test_timeout_zero_disables() {
        let flags = Flags {
            timeout: 0,
            ..Flags::default()
        };
        assert_eq!(flags.timeout(), None);
        assert_eq!(
            Flags::default().timeout(),
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
    }

    #[test]
    fn test_split_list() {
        let values = vec!["a,b".to_string(), "c".to_string(), "d,".to_string()];
        assert_eq!(split_list(&values), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_selection_defaults() {
        let selection = Selection::default();
        assert_eq!(selection.tools(), Tool::all());
        assert_eq!(selection.platforms(), Platform::host().into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_selection_dedups_and_removes() {
        let selection = Selection {
            platforms: vec![Platform::Linux, Platform::Darwin, Platform::Linux],
            tools: vec![Tool::GoVet, Tool::GoFmt, Tool::GoVet],
            removed: vec![Tool::GoFmt],
        };
        assert_eq!(selection.platforms(), vec![Platform::Linux, Platform::Darwin]);
        assert_eq!(selection.tools(), vec![Tool::GoVet]);
    }

    #[test]
    fn test_selection_removes_from_all() {
        let selection = Selection {
            removed: vec![Tool::SpellCheck, Tool::LineLength],
            ..Selection::default()
        };
        let tools = selection.tools();
        assert_eq!(tools.len(), Tool::all().len() - 2);
        assert!(!tools.contains(&Tool::SpellCheck));
    }

    #[test]
    fn test_run_config_from_flags() {
        let flags = Flags {
            length: 80,
            cgo: true,
            timeout: 0,
            ..Flags::default()
        };
        let config = RunConfig::new(&flags, &Selection::default()).module_root(true);
        assert_eq!(config.length, 80);
        assert!(config.cgo);
        assert!(config.module_root);
        assert_eq!(config.timeout, None);
    }
}
