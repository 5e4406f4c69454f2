//! The step contract and the plain command step.

use crate::error::{StepCause, StepError};
use crate::shell::{CommandResult, ExecContext, Invocation, ProcessError, ProcessRunner};
use std::path::PathBuf;
use tracing::debug;

/// One unit of pipeline work.
///
/// A step runs exactly one external process and, on success, returns its
/// configured message verbatim.
pub trait Executor {
    /// Step identifier used in errors and logs.
    fn name(&self) -> &str;

    /// Run the step's process through `runner`.
    fn execute(&self, runner: &dyn ProcessRunner) -> Result<String, StepError>;
}

/// A command that succeeds when it exits with status 0.
///
/// Also the shared record the other step kinds are built on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Step identifier.
    pub name: String,

    /// Program name or path.
    pub executable: String,

    /// Returned verbatim on success.
    pub message: String,

    /// Working directory.
    pub project_dir: PathBuf,

    /// Arguments, in order.
    pub args: Vec<String>,
}

impl Step {
    pub fn new<I, S>(
        name: &str,
        executable: &str,
        message: &str,
        project_dir: impl Into<PathBuf>,
        args: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            executable: executable.to_string(),
            message: message.to_string(),
            project_dir: project_dir.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Spawn the process under `ctx`, mapping failures to this step.
    pub(crate) fn launch(
        &self,
        runner: &dyn ProcessRunner,
        capture_output: bool,
        ctx: &ExecContext,
    ) -> Result<CommandResult, StepError> {
        let invocation = Invocation {
            program: self.executable.clone(),
            args: self.args.clone(),
            cwd: self.project_dir.clone(),
            capture_output,
        };

        debug!(step = %self.name, command = %invocation.command_line(), "running step");

        runner.run(&invocation, ctx).map_err(|err| {
            let message = match err {
                ProcessError::DeadlineExceeded { .. } => "timed out",
                _ => "failed to execute",
            };
            StepError::new(&self.name, message, err)
        })
    }

    /// Fail unless the process exited with status 0.
    pub(crate) fn check_exit(&self, result: &CommandResult) -> Result<(), StepError> {
        if result.success {
            return Ok(());
        }
        Err(StepError::new(
            &self.name,
            format!("{} failed", self.name),
            StepCause::Exit {
                code: result.exit_code,
            },
        ))
    }

    pub(crate) fn succeed(&self, result: &CommandResult) -> String {
        debug!(step = %self.name, duration = ?result.duration, "step succeeded");
        self.message.clone()
    }
}

impl Executor for Step {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, runner: &dyn ProcessRunner) -> Result<String, StepError> {
        let result = self.launch(runner, false, &ExecContext::background())?;
        self.check_exit(&result)?;
        Ok(self.succeed(&result))
    }
}
