//! Steps bounded by a deadline.

use super::step::{Executor, Step};
use crate::error::StepError;
use crate::shell::{ExecContext, ProcessRunner};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// A command that is killed if it runs longer than `timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutStep {
    pub step: Step,
    pub timeout: Duration,
}

impl TimeoutStep {
    /// `args` are the arguments after the executable.
    pub fn new<I, S>(
        name: &str,
        executable: &str,
        message: &str,
        project_dir: impl Into<PathBuf>,
        args: I,
        timeout: Duration,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            step: Step::new(name, executable, message, project_dir, args),
            timeout,
        }
    }
}

impl Executor for TimeoutStep {
    fn name(&self) -> &str {
        &self.step.name
    }

    fn execute(&self, runner: &dyn ProcessRunner) -> Result<String, StepError> {
        let ctx = ExecContext::with_timeout(self.timeout);
        let result = self.step.launch(runner, false, &ctx).inspect_err(|err| {
            if err.is_timeout() {
                warn!(step = %self.step.name, timeout = ?self.timeout, "step timed out");
            }
        })?;
        self.step.check_exit(&result)?;
        Ok(self.step.succeed(&result))
    }
}
