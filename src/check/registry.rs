//! Catalog of the checks gocomplain knows how to run.
//!
//! Every check is a [`Tool`] variant with a static [`ToolDescriptor`]
//! describing how it is invoked. Tools that need package resolution run
//! once over `./...` inside a module, but outside one they have to be handed
//! an explicit file list per directory.

use phf::phf_map;
use std::path::PathBuf;

use crate::config::{RunConfig, DEFAULT_CONFIDENCE};

/// A check gocomplain can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    GoFmt,
    GoFumpt,
    GoCyclo,
    IneffAssign,
    GoLint,
    GoVet,
    LineLength,
    SpellCheck,
    StaticCheck,
}

/// What kind of check a tool performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Formatter,
    ComplexityChecker,
    Linter,
    VetChecker,
    DeadAssignmentChecker,
    StaticAnalyzer,
    SpellChecker,
    LineLengthChecker,
}

/// How a tool is handed the code it should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// Once, with a package pattern.
    WholeModule,
    /// Once per directory, with that directory's files as arguments.
    PerFileGroup,
    /// No subprocess at all.
    InProcess,
}

/// Static description of a tool.
#[derive(Debug)]
pub struct ToolDescriptor {
    pub tool: Tool,
    pub name: &'static str,
    pub kind: ToolKind,
    /// Executable and leading arguments.
    pub command: &'static [&'static str],
    /// What to check when run over the whole module.
    pub target: &'static str,
    /// Needs an explicit file list outside a module.
    pub needs_module: bool,
    /// Results do not depend on `GOOS`, so it runs once per invocation.
    pub platform_independent: bool,
    /// Progress message shown before the tool runs.
    pub progress: &'static str,
}

/// All tools, in the order they run by default.
static REGISTRY: &[ToolDescriptor] = &[
    ToolDescriptor {
        tool: Tool::GoFmt,
        name: "gofmt",
        kind: ToolKind::Formatter,
        command: &["gofmt", "-l", "-s", "-w"],
        target: ".",
        needs_module: false,
        platform_independent: false,
        progress: "Formatting code (gofmt)...",
    },
    ToolDescriptor {
        tool: Tool::GoFumpt,
        name: "gofumpt",
        kind: ToolKind::Formatter,
        command: &["gofumpt", "-e", "-l", "-w"],
        target: ".",
        needs_module: false,
        platform_independent: false,
        progress: "Optimizing code (gofumpt)...",
    },
    ToolDescriptor {
        tool: Tool::GoCyclo,
        name: "gocyclo",
        kind: ToolKind::ComplexityChecker,
        command: &["gocyclo"],
        target: ".",
        needs_module: false,
        platform_independent: false,
        progress: "Checking code complexity (gocyclo)...",
    },
    ToolDescriptor {
        tool: Tool::IneffAssign,
        name: "ineffassign",
        kind: ToolKind::DeadAssignmentChecker,
        command: &["ineffassign"],
        target: "./...",
        needs_module: true,
        platform_independent: false,
        progress: "Looking for inefficient assignments (ineffassign)...",
    },
    ToolDescriptor {
        tool: Tool::GoLint,
        name: "golint",
        kind: ToolKind::Linter,
        command: &["golint"],
        target: "./...",
        needs_module: false,
        platform_independent: false,
        progress: "Linting code (golint)...",
    },
    ToolDescriptor {
        tool: Tool::GoVet,
        name: "govet",
        kind: ToolKind::VetChecker,
        command: &["go", "vet"],
        target: "./...",
        needs_module: true,
        platform_independent: false,
        progress: "Vetting code (go vet)...",
    },
    ToolDescriptor {
        tool: Tool::LineLength,
        name: "line-length",
        kind: ToolKind::LineLengthChecker,
        command: &[],
        target: "",
        needs_module: false,
        platform_independent: true,
        progress: "Checking for improper line-length...",
    },
    ToolDescriptor {
        tool: Tool::SpellCheck,
        name: "spellcheck",
        kind: ToolKind::SpellChecker,
        command: &["misspell"],
        target: ".",
        needs_module: false,
        platform_independent: true,
        progress: "Checking spelling...",
    },
    ToolDescriptor {
        tool: Tool::StaticCheck,
        name: "staticcheck",
        kind: ToolKind::StaticAnalyzer,
        command: &["staticcheck"],
        target: "./...",
        needs_module: true,
        platform_independent: false,
        progress: "Running static analysis (staticcheck)...",
    },
];

/// Canonical names and shorthands.
static NAMES: phf::Map<&'static str, Tool> = phf_map! {
    "cyclo" => Tool::GoCyclo,
    "gocyclo" => Tool::GoCyclo,
    "fmt" => Tool::GoFmt,
    "gofmt" => Tool::GoFmt,
    "fumpt" => Tool::GoFumpt,
    "gofumpt" => Tool::GoFumpt,
    "golint" => Tool::GoLint,
    "lint" => Tool::GoLint,
    "govet" => Tool::GoVet,
    "vet" => Tool::GoVet,
    "ineff" => Tool::IneffAssign,
    "ineffassign" => Tool::IneffAssign,
    "ll" => Tool::LineLength,
    "line-length" => Tool::LineLength,
    "spell" => Tool::SpellCheck,
    "spellcheck" => Tool::SpellCheck,
    "static" => Tool::StaticCheck,
    "staticcheck" => Tool::StaticCheck,
};

impl Tool {
    /// Every tool, in default run order.
    pub fn all() -> Vec<Tool> {
        REGISTRY.iter().map(|d| d.tool).collect()
    }

    /// Resolve a canonical name or shorthand.
    pub fn lookup(name: &str) -> Option<Tool> {
        NAMES.get(name).copied()
    }

    pub fn descriptor(self) -> &'static ToolDescriptor {
        // REGISTRY is laid out in declaration order.
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn kind(self) -> ToolKind {
        self.descriptor().kind
    }

    pub fn is_platform_independent(self) -> bool {
        self.descriptor().platform_independent
    }

    /// How the tool is invoked, given whether the run is at a module root.
    pub fn mode(self, module_root: bool) -> InvocationMode {
        match self {
            Tool::LineLength => InvocationMode::InProcess,
            Tool::SpellCheck => InvocationMode::PerFileGroup,
            _ => InvocationMode::select(self.descriptor().needs_module, module_root),
        }
    }

    /// Flags that depend on configuration.
    fn config_args(self, config: &RunConfig) -> Vec<String> {
        match self {
            Tool::GoCyclo => vec!["--over".to_string(), config.over.to_string()],
            Tool::GoLint if config.confidence != DEFAULT_CONFIDENCE => {
                vec!["-min_confidence".to_string(), config.confidence.to_string()]
            }
            Tool::SpellCheck if !config.ignore.is_empty() => {
                vec!["-i".to_string(), config.ignore.join(",")]
            }
            _ => Vec::new(),
        }
    }

    /// Arguments for a single whole-module invocation.
    pub fn module_argv(self, config: &RunConfig) -> Vec<String> {
        let d = self.descriptor();
        let mut argv: Vec<String> = d.command.iter().map(|s| s.to_string()).collect();
        argv.extend(self.config_args(config));
        if !d.target.is_empty() {
            argv.push(d.target.to_string());
        }
        argv
    }

    /// Arguments for one invocation over an explicit list of files.
    pub fn file_group_argv(self, config: &RunConfig, files: &[PathBuf]) -> Vec<String> {
        let mut argv: Vec<String> = self.descriptor().command.iter().map(|s| s.to_string()).collect();
        argv.extend(self.config_args(config));
        argv.extend(files.iter().map(|f| f.display().to_string()));
        argv
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl InvocationMode {
    /// Mode for a tool that does or does not need package resolution.
    pub fn select(needs_module: bool, module_root: bool) -> Self {
        if needs_module && !module_root {
            InvocationMode::PerFileGroup
        } else {
            InvocationMode::WholeModule
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_declaration_order() {
        for (idx, d) in REGISTRY.iter().enumerate() {
            assert_eq!(d.tool as usize, idx, "{} out of place", d.name);
        }
    }

    #[test]
    fn test_misspell_ignore_words() {
        let config = RunConfig {
            ignore: vec!["colour".to_string(), "Teh".to_string()],
            ..RunConfig::default()
        };
        let files = vec![PathBuf::from("a.go")];
        assert_eq!(
            Tool::SpellCheck.file_group_argv(&config, &files),
            ["misspell", "-i", "colour,Teh", "a.go"]
        );
    }

    #[test]
    fn test_default_order() {
        let names: Vec<_> = Tool::all().into_iter().map(Tool::name).collect();
        assert_eq!(
            names,
            vec![
                "gofmt",
                "gofumpt",
                "gocyclo",
                "ineffassign",
                "golint",
                "govet",
                "line-length",
                "spellcheck",
                "staticcheck"
            ]
        );
    }

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(Tool::lookup("vet"), Some(Tool::GoVet));
        assert_eq!(Tool::lookup("ll"), Some(Tool::LineLength));
        assert_eq!(Tool::lookup("static"), Some(Tool::StaticCheck));
        assert_eq!(Tool::lookup("ineff"), Some(Tool::IneffAssign));
        assert_eq!(Tool::lookup("rustfmt"), None);
        for tool in Tool::all() {
            assert_eq!(Tool::lookup(tool.name()), Some(tool));
        }
    }

    #[test]
    fn test_mode_depends_on_module_root() {
        assert_eq!(Tool::GoVet.mode(true), InvocationMode::WholeModule);
        assert_eq!(Tool::GoVet.mode(false), InvocationMode::PerFileGroup);
        assert_eq!(Tool::StaticCheck.mode(false), InvocationMode::PerFileGroup);
        assert_eq!(Tool::GoFmt.mode(false), InvocationMode::WholeModule);
        assert_eq!(Tool::GoCyclo.mode(false), InvocationMode::WholeModule);
        assert_eq!(Tool::LineLength.mode(true), InvocationMode::InProcess);
    }

    #[test]
    fn test_platform_independence() {
        let independent: Vec<_> = Tool::all()
            .into_iter()
            .filter(|t| t.is_platform_independent())
            .collect();
        assert_eq!(independent, vec![Tool::LineLength, Tool::SpellCheck]);
    }

    #[test]
    fn test_module_argv() {
        let config = RunConfig::default();
        assert_eq!(Tool::GoFmt.module_argv(&config), ["gofmt", "-l", "-s", "-w", "."]);
        assert_eq!(Tool::GoVet.module_argv(&config), ["go", "vet", "./..."]);
        assert_eq!(Tool::GoCyclo.module_argv(&config), ["gocyclo", "--over", "15", "."]);
        assert_eq!(Tool::GoLint.module_argv(&config), ["golint", "./..."]);
    }

    #[test]
    fn test_golint_confidence_only_when_changed() {
        let config = RunConfig {
            confidence: 0.5,
            ..RunConfig::default()
        };
        assert_eq!(
            Tool::GoLint.module_argv(&config),
            ["golint", "-min_confidence", "0.5", "./..."]
        );
    }

    #[test]
    fn test_file_group_argv() {
        let config = RunConfig::default();
        let files = vec![PathBuf::from("pkg/a.go"), PathBuf::from("pkg/b.go")];
        assert_eq!(
            Tool::StaticCheck.file_group_argv(&config, &files),
            ["staticcheck", "pkg/a.go", "pkg/b.go"]
        );
    }
}
