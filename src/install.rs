//! Installing and upgrading the underlying tools.
//!
//! Go tools are installed with `go install`. codespell is a Python tool, so
//! the user is told how to get it from their package manager instead.

use crate::check::{
    host_goos, run_command, spell, CommandExecutor, Diagnostic, Event, Normalizer, RunContext,
};

/// `go install` with the flags every tool is built with.
pub const GO_INSTALL: &[&str] = &[
    "go",
    "install",
    "--buildvcs=false",
    "--ldflags=-s -w",
    "--trimpath",
];

/// Tool name and the package it is installed from.
pub const TOOL_SOURCES: &[(&str, &str)] = &[
    ("gocyclo", "github.com/fzipp/gocyclo/cmd/gocyclo"),
    ("gofumpt", "mvdan.cc/gofumpt"),
    ("golint", "golang.org/x/lint/golint"),
    ("ineffassign", "github.com/gordonklaus/ineffassign"),
    ("misspell", "github.com/client9/misspell/cmd/misspell"),
    ("staticcheck", "honnef.co/go/tools/cmd/staticcheck"),
];

/// Linux package managers in order of preference, with the command that
/// installs codespell.
pub const PACKAGE_MANAGERS: &[(&str, &str)] = &[
    ("apk", "sudo apk add py3-codespell"),
    ("yay", "yay -S codespell"),
    ("pacman", "sudo pacman -S codespell"),
    ("apt-get", "sudo apt-get install codespell"),
    ("apt", "sudo apt install codespell"),
    ("zypper", "sudo zypper in codespell"),
    ("dnf", "sudo dnf install codespell"),
    ("yum", "sudo yum install codespell"),
];

pub fn install_argv(package: &str) -> Vec<String> {
    GO_INSTALL
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(format!("{}@latest", package)))
        .collect()
}

/// Install the newest version of every Go tool, then check for codespell.
pub fn update_install<E, F>(executor: &E, normalizer: &Normalizer, mut sink: F)
where
    E: CommandExecutor,
    F: FnMut(Event),
{
    let ctx = RunContext::host();

    sink(Event::Info("Installing newest versions of each tool...".to_string()));
    for (name, package) in TOOL_SOURCES {
        sink(Event::Step(format!("{}...", name)));
        for d in run_command(executor, normalizer, &install_argv(package), &ctx) {
            sink(Event::Diagnostic(d));
        }
    }

    for hint in codespell_hints(host_goos(), |p| executor.is_available(p)) {
        sink(Event::Diagnostic(Diagnostic::warn(hint)));
    }
}

/// What to tell the user about installing codespell on `goos`.
///
/// Empty when codespell is already installed.
pub fn codespell_hints(goos: &str, is_available: impl Fn(&str) -> bool) -> Vec<String> {
    match goos {
        "darwin" if !is_available(spell::CODESPELL) => {
            vec!["Please run \"brew install codespell\".".to_string()]
        }
        "linux" if !is_available(spell::CODESPELL) => {
            match PACKAGE_MANAGERS.iter().find(|(mgr, _)| is_available(mgr)) {
                Some((_, cmd)) => vec![format!("Please run \"{}\".", cmd)],
                None => vec![
                    "Unknown package manager.".to_string(),
                    "Please install codespell.".to_string(),
                ],
            }
        }
        "windows" => vec![format!("spellcheck tool for {} not implemented", goos)],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{ExecError, Level};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl CommandExecutor for Recorder {
        fn execute(&self, argv: &[String], _: &RunContext) -> Result<String, ExecError> {
            self.calls.borrow_mut().push(argv.to_vec());
            if argv.last().is_some_and(|a| a.starts_with("golang.org/x/lint")) {
                return Err(ExecError::Failed("go: module lookup disabled".to_string()));
            }
            Ok(String::new())
        }

        fn is_available(&self, _: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_install_argv() {
        assert_eq!(
            install_argv("mvdan.cc/gofumpt"),
            [
                "go",
                "install",
                "--buildvcs=false",
                "--ldflags=-s -w",
                "--trimpath",
                "mvdan.cc/gofumpt@latest"
            ]
        );
    }

    #[test]
    fn test_update_install_runs_every_tool() {
        let exec = Recorder::default();
        let mut events = Vec::new();
        update_install(&exec, &Normalizer::new(None), |e| events.push(e));

        let calls = exec.calls.borrow();
        assert_eq!(calls.len(), TOOL_SOURCES.len());
        assert_eq!(calls[0].last().unwrap(), "github.com/fzipp/gocyclo/cmd/gocyclo@latest");

        assert_eq!(events[0], Event::Info("Installing newest versions of each tool...".into()));
        assert_eq!(events[1], Event::Step("gocyclo...".into()));

        let errors: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Diagnostic(d) if d.level == Level::Error => Some(d.message.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(errors, vec!["go: module lookup disabled"]);
    }

    #[test]
    fn test_darwin_hint() {
        assert_eq!(
            codespell_hints("darwin", |_| false),
            vec!["Please run \"brew install codespell\"."]
        );
        assert!(codespell_hints("darwin", |_| true).is_empty());
    }

    #[test]
    fn test_linux_hint_uses_first_package_manager() {
        let hints = codespell_hints("linux", |p| p == "apt" || p == "dnf");
        assert_eq!(hints, vec!["Please run \"sudo apt install codespell\"."]);

        let hints = codespell_hints("linux", |p| p == "pacman" || p == "yay");
        assert_eq!(hints, vec!["Please run \"yay -S codespell\"."]);
    }

    #[test]
    fn test_linux_hint_without_package_manager() {
        assert_eq!(
            codespell_hints("linux", |_| false),
            vec!["Unknown package manager.", "Please install codespell."]
        );
    }

    #[test]
    fn test_linux_with_codespell_needs_nothing() {
        assert!(codespell_hints("linux", |p| p == "codespell").is_empty());
    }

    #[test]
    fn test_windows_hint() {
        assert_eq!(
            codespell_hints("windows", |_| false),
            vec!["spellcheck tool for windows not implemented"]
        );
    }
}
