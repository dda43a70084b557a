//! Running checks over a source tree and normalizing what they report.

mod exec;
mod files;
mod line_length;
mod normalize;
mod platform;
mod registry;
mod runner;
pub mod spell;
mod types;

pub use exec::{execute, CommandExecutor, ExecError, SystemExecutor};
pub use files::{classify, is_ignored, SOURCE_SUFFIX, TEST_SUFFIX, VCS_DIR};
pub use line_length::{scan_file, scan_lines};
pub use normalize::{NormalizeOptions, Normalizer, IGNORABLE_PATTERNS, NOISE_PREFIXES};
pub use platform::{host_goos, Platform, RunContext};
pub use registry::{InvocationMode, Tool, ToolDescriptor, ToolKind};
pub use runner::{run_command, Runner};
pub use types::{Diagnostic, Event, FileSet, FileSets, Level};
