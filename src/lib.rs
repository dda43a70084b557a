//! gocomplain - run a suite of Go linters and formatters in one pass.
//!
//! gocomplain walks a Go source tree, runs gofmt, gofumpt, gocyclo,
//! ineffassign, golint, go vet, staticcheck and the misspell/codespell
//! spell checkers over it for one or more target platforms, checks line
//! lengths itself, and prints everything as one normalized stream.
//!
//! # Architecture
//!
//! - `check`: file classification, the tool catalog, subprocess execution,
//!   output normalization and the run orchestrator
//! - `config`: rc file and flag merging
//! - `module`: Go module root detection
//! - `install`: installing the underlying tools
//! - `report`: terminal output
//! - `cli`: argument parsing and the top-level run

pub mod check;
pub mod cli;
pub mod config;
pub mod install;
pub mod module;
pub mod report;

pub use check::{
    classify, scan_lines, CommandExecutor, Diagnostic, Event, ExecError, FileSet, FileSets,
    Level, Normalizer, Platform, RunContext, Runner, SystemExecutor, Tool,
};
pub use config::{ConfigError, FileConfig, Flags, RunConfig, Selection};

/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
