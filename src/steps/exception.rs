//! Steps whose output is itself the failure signal.
//!
//! Formatters and linters often exit 0 while listing findings; an
//! [`ExceptionStep`] treats any such output as a failure.

use super::step::{Executor, Step};
use crate::error::{StepCause, StepError};
use crate::shell::{ExecContext, ProcessRunner};
use std::path::PathBuf;

/// A command that must exit 0 and print nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionStep {
    pub step: Step,
}

impl ExceptionStep {
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
            step: Step::new(name, executable, message, project_dir, args),
        }
    }
}

impl Executor for ExceptionStep {
    fn name(&self) -> &str {
        &self.step.name
    }

    fn execute(&self, runner: &dyn ProcessRunner) -> Result<String, StepError> {
        let result = self
            .step
            .launch(runner, true, &ExecContext::background())?;
        self.step.check_exit(&result)?;

        let output = result.output.trim();
        if !output.is_empty() {
            return Err(StepError::new(
                &self.step.name,
                "failed",
                StepCause::ReportedIssues {
                    output: output.to_string(),
                },
            ));
        }

        Ok(self.step.succeed(&result))
    }
}
