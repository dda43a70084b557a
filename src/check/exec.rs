//! Execution of external tools.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use super::RunContext;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors from running an external command.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to read cmd output: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to wait for {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// Non-zero exit with something on stderr.
    #[error("{0}")]
    Failed(String),
    /// Non-zero exit with nothing on stderr.
    #[error("{command}: exit status {code}")]
    Status {
        command: String,
        code: i32,
        stdout: String,
    },
    #[error("{command}: timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Runs a command for a platform. The seam the orchestrator is generic over.
pub trait CommandExecutor {
    /// Run `argv` with the context's environment overrides and return its
    /// standard output.
    fn execute(&self, argv: &[String], ctx: &RunContext) -> Result<String, ExecError>;

    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Executes commands as real child processes.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
    debug: bool,
}

impl SystemExecutor {
    /// A `timeout` of `None` waits forever.
    pub fn new(timeout: Option<Duration>, debug: bool) -> Self {
        Self { timeout, debug }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new(None, false)
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, argv: &[String], ctx: &RunContext) -> Result<String, ExecError> {
        execute(argv, ctx.envs(), self.timeout, self.debug)
    }
}

/// Run `argv` to completion and capture its output.
///
/// An empty `argv` is a no-op. On a non-zero exit the trimmed standard
/// error becomes the error; if standard error was empty the exit status is
/// reported along with whatever standard output was captured. There are no
/// retries.
pub fn execute(
    argv: &[String],
    env: &[(String, String)],
    timeout: Option<Duration>,
    debug_log: bool,
) -> Result<String, ExecError> {
    let Some((program, args)) = argv.split_first() else {
        return Ok(String::new());
    };

    let command = argv.join(" ");
    if debug_log {
        debug!("{}", command);
    }

    let mut child = Command::new(program)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(ExecError::Spawn)?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = match wait(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            // Readers may never finish if a grandchild holds the pipes.
            return Err(ExecError::Timeout {
                command,
                timeout: timeout.unwrap_or_default(),
            });
        }
        Err(source) => return Err(ExecError::Wait { command, source }),
    };

    let stdout = collect(stdout);
    let stderr = collect(stderr);
    let stdout = stdout.strip_suffix('\n').unwrap_or(&stdout).to_string();

    if status.success() {
        return Ok(stdout);
    }

    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return Err(ExecError::Failed(stderr.to_string()));
    }

    Err(ExecError::Status {
        command,
        code: status.code().unwrap_or(-1),
        stdout,
    })
}

/// Wait for `child`, killing it once `timeout` has passed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
