//! External process execution.

use super::context::ExecContext;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// How often a deadline-bound wait checks the child.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments, in order.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: PathBuf,

    /// Capture stdout and stderr into one buffer (if false, inherits from parent).
    pub capture_output: bool,
}

impl Invocation {
    /// Program and arguments joined by spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Combined stdout and stderr (empty unless captured).
    pub output: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(output: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            output,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, output: String, duration: Duration) -> Self {
        Self {
            exit_code,
            output,
            duration,
            success: false,
        }
    }

    fn from_status(status: ExitStatus, output: String, duration: Duration) -> Self {
        if status.success() {
            Self::success(output, duration)
        } else {
            Self::failure(status.code(), output, duration)
        }
    }
}

/// A process that did not run to completion.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting on '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("deadline of {timeout:?} exceeded")]
    DeadlineExceeded { timeout: Duration },
}

/// Capability to run an external process.
///
/// Implementations return `Ok` for any process that ran to completion,
/// whatever its exit status; `Err` means it never started, could not be
/// waited on, or was killed because `ctx` expired.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation, ctx: &ExecContext)
        -> Result<CommandResult, ProcessError>;
}

/// Runs processes on the host with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        invocation: &Invocation,
        ctx: &ExecContext,
    ) -> Result<CommandResult, ProcessError> {
        if ctx.is_expired() {
            return Err(ProcessError::DeadlineExceeded {
                timeout: ctx.timeout().unwrap_or_default(),
            });
        }

        let start = Instant::now();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null());

        if invocation.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "spawning process"
        );

        let mut child = cmd.spawn().map_err(|source| ProcessError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

        let output_rx = invocation
            .capture_output
            .then(|| drain_output(&mut child));

        let status = match ctx.deadline() {
            Some(deadline) => wait_until(
                &mut child,
                &invocation.program,
                deadline,
                ctx.timeout().unwrap_or_default(),
            )?,
            None => child.wait().map_err(|source| ProcessError::Wait {
                program: invocation.program.clone(),
                source,
            })?,
        };

        // Reader threads exit once both pipes reach EOF.
        let output = output_rx
            .map(|rx| {
                let bytes: Vec<u8> = rx.iter().flatten().collect();
                String::from_utf8_lossy(&bytes).into_owned()
            })
            .unwrap_or_default();

        let duration = start.elapsed();
        debug!(
            command = %invocation.command_line(),
            code = ?status.code(),
            ?duration,
            "process exited"
        );

        Ok(CommandResult::from_status(status, output, duration))
    }
}

/// Move the child's pipes onto reader threads that feed one channel.
fn drain_output(child: &mut Child) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();

    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, tx);
    }

    rx
}

fn spawn_reader<R>(mut reader: R, tx: mpsc::Sender<Vec<u8>>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Wait for `child` until `deadline`, killing it on overrun.
fn wait_until(
    child: &mut Child,
    program: &str,
    deadline: Instant,
    timeout: Duration,
) -> Result<ExitStatus, ProcessError> {
    let wait_error = |source: io::Error| ProcessError::Wait {
        program: program.to_string(),
        source,
    };

    loop {
        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(status);
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(program, ?timeout, "deadline exceeded, killing process");
            if let Err(e) = child.kill() {
                warn!(program, "failed to kill process: {}", e);
            }
            // Reap so the child does not linger as a zombie.
            let _ = child.wait();
            return Err(ProcessError::DeadlineExceeded { timeout });
        }

        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
