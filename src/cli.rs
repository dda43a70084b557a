//! Command-line interface for gocomplain.

use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::check::{classify, Normalizer, Platform, Runner, SystemExecutor, Tool};
use crate::config::{
    split_list, FileConfig, Flags, RunConfig, Selection, DEFAULT_CONFIDENCE, DEFAULT_LENGTH,
    DEFAULT_OVER, DEFAULT_TIMEOUT_SECS,
};
use crate::report::{self, Reporter};
use crate::{install, module, VERSION};

/// Exit codes.
pub const EXIT_GOOD: i32 = 0;
pub const EXIT_INVALID_OPTION: i32 = 1;
pub const EXIT_MISSING_OPTION: i32 = 2;
pub const EXIT_INVALID_ARGUMENT: i32 = 3;
pub const EXIT_MISSING_ARGUMENT: i32 = 4;
pub const EXIT_EXTRA_ARGUMENT: i32 = 5;
pub const EXIT_EXCEPTION: i32 = 6;

const ACTIONS_HELP: &str = "\
ACTIONS - COMMANDS:
  h, help                         Display this help message.
  i, install, u, update, upgrade  Install or reinstall underlying tools.
  v, version                      Show version.

ACTIONS - ENV:
  allos, ao, dlw                  Check all supported GOOS.
  darwin, linux, windows          Check the specified GOOS (default: host).
  d, l, w                         Shorthand for associated GOOS.

ACTIONS - TOOLS:
  alltools, all, at               Run all tools (default).
  gocyclo, gofmt, gofumpt, golint, govet, ineffassign, line-length,
  spellcheck, staticcheck         Run the specified tool.
  cyclo, fmt, fumpt, lint, vet, ineff, ll, spell, static
                                  Shorthand for associated tools.
  no<tool>                        Skip a tool, e.g. nolint.

EXIT STATUS:
  1: Invalid option
  2: Missing option
  3: Invalid argument
  4: Missing argument
  5: Extra argument
  6: Exception";

/// Combine multiple Go source analyzing tools.
///
/// Currently supported functionality includes gocyclo, gofmt, gofumpt,
/// golint, go vet, ineffassign, line-length verification, spellcheck and
/// staticcheck. Spellcheck uses misspell as well as codespell on Linux and
/// macOS.
#[derive(Parser, Debug)]
#[command(name = "gocomplain")]
#[command(author, about, long_about = None, after_help = ACTIONS_HELP)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Only complain about golint problems with at least this confidence
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Enable cgo when checking other platforms
    #[arg(long)]
    pub cgo: bool,

    /// Print executed sub-processes
    #[arg(short, long)]
    pub debug: bool,

    /// Ignore words when checking spelling (comma-separated, repeatable)
    #[arg(short, long, value_name = "WORDS")]
    pub ignore: Vec<String>,

    /// Max length of source code lines
    #[arg(short, long, default_value_t = DEFAULT_LENGTH)]
    pub length: usize,

    /// Disable colorized output
    #[arg(long)]
    pub no_color: bool,

    /// Only complain about functions over this complexity
    #[arg(short, long, default_value_t = DEFAULT_OVER)]
    pub over: u32,

    /// Prune directories/files when analyzing source files
    #[arg(short, long, value_name = "PATHS")]
    pub prune: Vec<String>,

    /// Hide information log messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Skip directories/files when checking spelling
    #[arg(short, long, value_name = "PATHS")]
    pub skip: Vec<String>,

    /// Seconds before a tool is killed (0 waits forever)
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Show stacktrace, if error
    #[arg(short, long)]
    pub verbose: bool,

    /// Show version
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Actions to perform (see below)
    #[arg(value_name = "ACTION")]
    pub actions: Vec<String>,
}

impl Cli {
    pub fn flags(&self) -> Flags {
        Flags {
            confidence: self.confidence,
            ignore: split_list(&self.ignore),
            length: self.length,
            over: self.over,
            prune: split_list(&self.prune),
            quiet: self.quiet,
            skip: split_list(&self.skip),
            cgo: self.cgo,
            debug: self.debug,
            timeout: self.timeout,
        }
    }
}

/// A positional action word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Install,
    Version,
    Platforms(Vec<Platform>),
    Tools(Vec<Tool>),
    Remove(Tool),
}

impl Action {
    pub fn parse(word: &str) -> Option<Self> {
        let action = match word {
            "h" | "help" => Action::Help,
            "i" | "install" | "u" | "update" | "upgrade" => Action::Install,
            "v" | "version" => Action::Version,
            "d" | "darwin" => Action::Platforms(vec![Platform::Darwin]),
            "l" | "linux" => Action::Platforms(vec![Platform::Linux]),
            "w" | "windows" => Action::Platforms(vec![Platform::Windows]),
            "dlw" | "allos" | "ao" => Action::Platforms(Platform::ALL.to_vec()),
            "all" | "alltools" | "at" => Action::Tools(Tool::all()),
            _ => {
                if let Some(tool) = Tool::lookup(word) {
                    Action::Tools(vec![tool])
                } else {
                    Action::Remove(Tool::lookup(word.strip_prefix("no")?)?)
                }
            }
        };
        Some(action)
    }
}

/// Parse every action word, or return the first unknown one.
pub fn parse_actions<S: AsRef<str>>(words: &[S]) -> Result<Vec<Action>, String> {
    words
        .iter()
        .map(|w| Action::parse(w.as_ref()).ok_or_else(|| w.as_ref().to_string()))
        .collect()
}

pub fn selection(actions: &[Action]) -> Selection {
    let mut selection = Selection::default();
    for action in actions {
        match action {
            Action::Platforms(p) => selection.platforms.extend(p),
            Action::Tools(t) => selection.tools.extend(t),
            Action::Remove(t) => selection.removed.push(*t),
            Action::Help | Action::Install | Action::Version => {}
        }
    }
    selection
}

/// Send tracing output to stderr. `--debug` turns on debug output for this
/// crate; otherwise `RUST_LOG` decides, defaulting to warnings only.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("gocomplain=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run gocomplain and return the exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.debug);

    let actions = match parse_actions(&cli.actions) {
        Ok(actions) => actions,
        Err(word) => {
            eprintln!("{}", report::error(&format!("Invalid argument: {}", word)));
            eprintln!("Run 'gocomplain help' for usage");
            return Ok(EXIT_INVALID_ARGUMENT);
        }
    };

    if actions.contains(&Action::Help) {
        Cli::command().print_long_help()?;
        return Ok(EXIT_GOOD);
    }

    let install = actions.contains(&Action::Install);
    if install && actions.len() != 1 {
        eprintln!("{}", report::error("install takes no other actions"));
        return Ok(EXIT_EXTRA_ARGUMENT);
    }

    let file = match FileConfig::load_default() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{}", report::error(&e.to_string()));
            return Ok(EXIT_INVALID_OPTION);
        }
    };
    let flags = cli.flags().merge(&file);
    if let Err(e) = flags.validate() {
        eprintln!("{}", report::error(&e.to_string()));
        return Ok(EXIT_INVALID_OPTION);
    }

    if cli.version || actions.contains(&Action::Version) {
        println!("gocomplain version {}", VERSION);
        return Ok(EXIT_GOOD);
    }

    let mut reporter = Reporter::new(flags.quiet);

    if install {
        let executor = SystemExecutor::new(flags.timeout(), flags.debug);
        install::update_install(&executor, &Normalizer::from_current_dir(), |e| {
            reporter.handle(e)
        });
        return Ok(EXIT_GOOD);
    }

    let module_root = module::enter_root()?;
    let config = RunConfig::new(&flags, &selection(&actions)).module_root(module_root);
    debug!(
        "module_root={} platforms={:?} tools={:?}",
        config.module_root, config.platforms, config.tools
    );

    let sets = classify(".", &config.prune);
    debug!("classified {} files", sets.file_count());

    Runner::new(&config, &sets).run_with(|e| reporter.handle(e));
    reporter.done();

    Ok(EXIT_GOOD)
}
