//! Pipeline execution orchestration.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{GociError, Result, ValidationError};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::steps::{ExceptionStep, Executor, Step, TimeoutStep};

pub const BUILD_SUCCESS: &str = "Go Build:SUCCESS";
pub const TEST_SUCCESS: &str = "Go Test:SUCCESS";
pub const FMT_SUCCESS: &str = "Gofmt:SUCCESS";
pub const PUSH_SUCCESS: &str = "Git Push:SUCCESS";

/// Upper bound on the push step.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Compile the package. Building `errors` alongside `.` keeps `go build`
/// from writing a binary into the project.
pub fn build_step(project_dir: &Path) -> Step {
    Step::new(
        "go build",
        "go",
        BUILD_SUCCESS,
        project_dir,
        ["build", ".", "errors"],
    )
}

pub fn test_step(project_dir: &Path) -> Step {
    Step::new("go test", "go", TEST_SUCCESS, project_dir, ["test", "-v"])
}

/// List unformatted files; any listed file fails the step.
pub fn fmt_step(project_dir: &Path) -> ExceptionStep {
    ExceptionStep::new("go fmt", "gofmt", FMT_SUCCESS, project_dir, ["-l", "."])
}

pub fn push_step(project_dir: &Path) -> TimeoutStep {
    TimeoutStep::new(
        "git push",
        "git",
        PUSH_SUCCESS,
        project_dir,
        ["push", "origin", "master"],
        PUSH_TIMEOUT,
    )
}

/// An ordered sequence of steps that stops at the first failure.
pub struct Pipeline {
    steps: Vec<Box<dyn Executor>>,
}

impl Pipeline {
    /// Build, test, format check, push.
    pub fn standard(project_dir: &Path) -> Self {
        Self {
            steps: vec![
                Box::new(build_step(project_dir)),
                Box::new(test_step(project_dir)),
                Box::new(fmt_step(project_dir)),
                Box::new(push_step(project_dir)),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names, in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order, writing each success message as a line to
    /// `out`. The first failing step's error is returned unchanged and no
    /// later step runs.
    pub fn run(&self, runner: &dyn ProcessRunner, out: &mut dyn Write) -> Result<()> {
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = step.name(), index, total, "starting step");
            let message = step.execute(runner)?;
            writeln!(out, "{}", message).map_err(GociError::Output)?;
        }

        info!(steps = total, "pipeline succeeded");
        Ok(())
    }
}

/// Reject an empty project path.
pub fn validate_project(project: &str) -> Result<&Path> {
    if project.is_empty() {
        return Err(GociError::Validation {
            message: "project directory is required".to_string(),
            source: ValidationError::MissingInput,
        });
    }
    Ok(Path::new(project))
}

/// Run the standard pipeline for `project` on the host.
pub fn run(project: &str, out: &mut dyn Write) -> Result<()> {
    run_with(project, out, &SystemRunner)
}

/// Run the standard pipeline for `project` through `runner`.
pub fn run_with(project: &str, out: &mut dyn Write, runner: &dyn ProcessRunner) -> Result<()> {
    let project_dir = validate_project(project)?;
    Pipeline::standard(project_dir).run(runner, out)
}
