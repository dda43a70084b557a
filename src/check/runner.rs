//! Run orchestration across platforms and tools.

use crate::config::RunConfig;

use super::{
    scan_lines, spell, CommandExecutor, Diagnostic, Event, ExecError, FileSet, FileSets,
    InvocationMode, Level, Normalizer, RunContext, SystemExecutor, Tool,
};

/// Drives every selected tool over every selected platform.
///
/// Platform-sensitive tools run once per platform, in tool order.
/// Line-length and spell checks do not depend on `GOOS` and run once after
/// the platform loop, against the host.
pub struct Runner<'a, E: CommandExecutor = SystemExecutor> {
    config: &'a RunConfig,
    sets: &'a FileSets,
    executor: E,
    normalizer: Normalizer,
}

impl<'a> Runner<'a, SystemExecutor> {
    /// Runner that spawns real processes, normalizing against the current
    /// working directory.
    pub fn new(config: &'a RunConfig, sets: &'a FileSets) -> Self {
        let executor = SystemExecutor::new(config.timeout, config.debug);
        Self::with_executor(config, sets, executor)
    }
}

impl<'a, E: CommandExecutor> Runner<'a, E> {
    pub fn with_executor(config: &'a RunConfig, sets: &'a FileSets, executor: E) -> Self {
        Self {
            config,
            sets,
            executor,
            normalizer: Normalizer::from_current_dir(),
        }
    }

    /// Replace the output normalizer.
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run everything and collect the diagnostics.
    pub fn run(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        self.run_with(|event| {
            if let Event::Diagnostic(d) = event {
                out.push(d);
            }
        });
        out
    }

    /// Run everything, handing each event to `sink` as it happens.
    pub fn run_with<F: FnMut(Event)>(&self, mut sink: F) {
        let per_platform: Vec<Tool> = self
            .config
            .tools
            .iter()
            .copied()
            .filter(|t| !t.is_platform_independent())
            .collect();

        for ctx in self.contexts() {
            sink(Event::Info(format!("Setting GOOS to {}", ctx.goos())));

            for tool in &per_platform {
                sink(Event::Step(tool.descriptor().progress.to_string()));
                let found = tool.run(self.config, self.sets, &self.executor, &self.normalizer, &ctx);
                emit(&mut sink, found);
            }
        }

        let host = RunContext::host();
        for tool in self.config.tools.iter().filter(|t| t.is_platform_independent()) {
            sink(Event::Info(tool.descriptor().progress.to_string()));
            let found = tool.run(self.config, self.sets, &self.executor, &self.normalizer, &host);
            emit(&mut sink, found);
        }
    }

    /// One context per selected platform, or the host when none were.
    fn contexts(&self) -> Vec<RunContext> {
        if self.config.platforms.is_empty() {
            return vec![RunContext::host()];
        }
        self.config
            .platforms
            .iter()
            .map(|p| RunContext::for_platform(*p, self.config.cgo))
            .collect()
    }
}

fn emit<F: FnMut(Event)>(sink: &mut F, found: Vec<Diagnostic>) {
    for d in found {
        sink(Event::Diagnostic(d));
    }
}

impl Tool {
    /// Run this tool once for `ctx` and collect what it reports.
    pub fn run<E: CommandExecutor>(
        self,
        config: &RunConfig,
        sets: &FileSets,
        executor: &E,
        normalizer: &Normalizer,
        ctx: &RunContext,
    ) -> Vec<Diagnostic> {
        match self.mode(config.module_root) {
            InvocationMode::InProcess => scan_lines(config.length, &sets.code()),
            InvocationMode::WholeModule => {
                run_command(executor, normalizer, &self.module_argv(config), ctx)
            }
            InvocationMode::PerFileGroup => {
                // misspell also reads non-Go files.
                let groups = if self == Tool::SpellCheck {
                    sets.all().to_vec()
                } else {
                    sets.code().to_vec()
                };
                let mut found: Vec<Diagnostic> = groups
                    .into_iter()
                    .flat_map(|set| set.iter())
                    .flat_map(|(dir, files)| {
                        let argv = self.file_group_argv(config, &FileSet::bucket_paths(dir, files));
                        run_command(executor, normalizer, &argv, ctx)
                    })
                    .collect();
                if self == Tool::SpellCheck {
                    found.extend(codespell(config, executor, normalizer, ctx));
                }
                found
            }
        }
    }
}

fn codespell<E: CommandExecutor>(
    config: &RunConfig,
    executor: &E,
    normalizer: &Normalizer,
    ctx: &RunContext,
) -> Vec<Diagnostic> {
    match spell::codespell_command(executor, &config.ignore, &config.skip) {
        Ok(argv) => run_command(executor, normalizer, &argv, ctx),
        Err(e) => vec![Diagnostic::warn(e.to_string())],
    }
}

/// Run one command and turn its output into diagnostics.
///
/// Output of a successful run is reported as warnings and a failure as
/// errors, unless the normalizer recognizes it as an expected no-op.
pub fn run_command<E: CommandExecutor>(
    executor: &E,
    normalizer: &Normalizer,
    argv: &[String],
    ctx: &RunContext,
) -> Vec<Diagnostic> {
    let (raw, level) = match executor.execute(argv, ctx) {
        Ok(stdout) => (stdout, Level::Warn),
        // Tools like gocyclo exit non-zero when they have findings.
        Err(ExecError::Status { stdout, .. }) if !stdout.is_empty() => (stdout, Level::Warn),
        Err(e) => (e.to_string(), Level::Error),
    };

    normalizer
        .normalize(&raw)
        .into_iter()
        .map(|message| Diagnostic { level, message })
        .collect()
}
