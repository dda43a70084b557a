//! Terminal output for progress and diagnostics.
//!
//! Every line gets a colored tag:
//! - `[*]` info
//! - `[=]` step
//! - `[!]` warning
//! - `[-]` error
//! - `[+]` success
//!
//! Colors follow `colored`'s global override, so `--no-color` only has to
//! flip that once.

use colored::*;

use crate::check::{Diagnostic, Event, Level};

/// Tag and message for an info line.
pub fn info(msg: &str) -> String {
    format!("{} {}", "[*]".cyan().bold(), msg)
}

/// Tag and message for a step within the current platform.
pub fn step(msg: &str) -> String {
    format!("{} {}", "[=]".cyan(), msg)
}

pub fn warn(msg: &str) -> String {
    format!("{} {}", "[!]".yellow().bold(), msg)
}

pub fn error(msg: &str) -> String {
    format!("{} {}", "[-]".red().bold(), msg)
}

pub fn good(msg: &str) -> String {
    format!("{} {}", "[+]".green().bold(), msg)
}

pub fn diagnostic(d: &Diagnostic) -> String {
    match d.level {
        Level::Warn => warn(&d.message),
        Level::Error => error(&d.message),
    }
}

/// Prints run events as they arrive.
///
/// Quiet mode hides progress but never diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
    warnings: usize,
    errors: usize,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    /// Rendered line for `event`, or `None` if it is hidden.
    pub fn render(&self, event: &Event) -> Option<String> {
        match event {
            Event::Info(msg) if !self.quiet => Some(info(msg)),
            Event::Step(msg) if !self.quiet => Some(step(msg)),
            Event::Info(_) | Event::Step(_) => None,
            Event::Diagnostic(d) => Some(diagnostic(d)),
        }
    }

    pub fn handle(&mut self, event: Event) {
        if let Event::Diagnostic(d) = &event {
            match d.level {
                Level::Warn => self.warnings += 1,
                Level::Error => self.errors += 1,
            }
        }
        if let Some(line) = self.render(&event) {
            println!("{}", line);
        }
    }

    /// Closing line with the diagnostic tally, e.g. `Done (2 warnings, 1 error)`.
    pub fn summary(&self) -> String {
        if self.warnings == 0 && self.errors == 0 {
            return "Done".to_string();
        }
        format!(
            "Done ({}, {})",
            plural(self.warnings, "warning"),
            plural(self.errors, "error")
        )
    }

    /// Final success line, unless quiet.
    pub fn done(&self) {
        if !self.quiet {
            println!("{}", good(&self.summary()));
        }
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn errors(&self) -> usize {
        self.errors
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        let out = f();
        colored::control::unset_override();
        out
    }

    #[test]
    fn test_tags() {
        plain(|| {
            assert_eq!(info("Setting GOOS to linux"), "[*] Setting GOOS to linux");
            assert_eq!(step("Vetting code (go vet)..."), "[=] Vetting code (go vet)...");
            assert_eq!(diagnostic(&Diagnostic::warn("a.go:1 (71) x")), "[!] a.go:1 (71) x");
            assert_eq!(diagnostic(&Diagnostic::error("boom")), "[-] boom");
            assert_eq!(good("Done"), "[+] Done");
        });
    }

    #[test]
    fn test_quiet_hides_progress_only() {
        let reporter = Reporter::new(true);
        assert_eq!(reporter.render(&Event::Info("hidden".into())), None);
        assert_eq!(reporter.render(&Event::Step("hidden".into())), None);
        assert!(reporter
            .render(&Event::Diagnostic(Diagnostic::warn("shown")))
            .is_some());
    }

    #[test]
    fn test_counts_diagnostics() {
        let mut reporter = Reporter::new(true);
        reporter.handle(Event::Diagnostic(Diagnostic::warn("one")));
        reporter.handle(Event::Diagnostic(Diagnostic::warn("two")));
        reporter.handle(Event::Diagnostic(Diagnostic::error("three")));
        reporter.handle(Event::Info("ignored".into()));
        assert_eq!(reporter.warnings(), 2);
        assert_eq!(reporter.errors(), 1);
        assert_eq!(reporter.summary(), "Done (2 warnings, 1 error)");
    }

    #[test]
    fn test_clean_run_summary() {
        let mut reporter = Reporter::new(false);
        assert_eq!(reporter.summary(), "Done");
        reporter.handle(Event::Step("Formatting code (gofmt)...".into()));
        assert_eq!(reporter.summary(), "Done");
        reporter.handle(Event::Diagnostic(Diagnostic::error("boom")));
        assert_eq!(reporter.summary(), "Done (0 warnings, 1 error)");
    }
}
