//! Error types for goci operations.
//!
//! This module defines [`GociError`], the error returned by a pipeline run,
//! the per-step [`StepError`], and the [`ValidationError`] sentinel.
//!
//! # Error Handling Strategy
//!
//! - Nothing is retried or recovered locally; every error aborts the run
//! - Callers identify a failed step by name ([`StepError`] equality), never
//!   by message text
//! - Validation failures always wrap [`ValidationError`] so they can be
//!   found with [`find_cause`] however deeply they are wrapped

use crate::shell::ProcessError;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Sentinel for "required input missing".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("validation failed")]
    MissingInput,
}

/// Why a step failed.
#[derive(Debug, Error)]
pub enum StepCause {
    /// The process could not be started, waited on, or overran its deadline.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The process ran to completion with a non-zero status.
    #[error("exit status {code:?}")]
    Exit { code: Option<i32> },

    /// The tool exited cleanly but printed findings.
    #[error("tool reported issues: {}", truncate_output(.output))]
    ReportedIssues { output: String },
}

/// Longest stretch of tool output shown in an error message.
const MAX_DISPLAYED_OUTPUT: usize = 1024;

/// Cut `output` to [`MAX_DISPLAYED_OUTPUT`] bytes on a char boundary.
fn truncate_output(output: &str) -> Cow<'_, str> {
    if output.len() <= MAX_DISPLAYED_OUTPUT {
        return Cow::Borrowed(output);
    }
    let mut end = MAX_DISPLAYED_OUTPUT;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!(
        "{}... ({} more bytes)",
        &output[..end],
        output.len() - end
    ))
}

/// A failed pipeline step.
///
/// Two step errors compare equal when they name the same step; message and
/// cause are diagnostic detail only.
#[derive(Debug)]
pub struct StepError {
    step: String,
    message: String,
    cause: Option<StepCause>,
}

impl StepError {
    /// Create an error for `step` wrapping `cause`.
    pub fn new(step: &str, message: impl Into<String>, cause: impl Into<StepCause>) -> Self {
        Self {
            step: step.to_string(),
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// An error carrying only a step name, for matching against results.
    pub fn named(step: &str) -> Self {
        Self {
            step: step.to_string(),
            message: String::new(),
            cause: None,
        }
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&StepCause> {
        self.cause.as_ref()
    }

    /// Whether the step was cancelled because it overran its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.cause,
            Some(StepCause::Process(ProcessError::DeadlineExceeded { .. }))
        )
    }
}

impl PartialEq for StepError {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
    }
}

impl Eq for StepError {}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step: {:?}: {}", self.step, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": Cause: {}", cause)?;
        }
        Ok(())
    }
}

impl StdError for StepError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(|c| c as &(dyn StdError + 'static))
    }
}

/// Core error type for a pipeline run.
#[derive(Debug, Error)]
pub enum GociError {
    /// Input was rejected before any step ran.
    #[error("{message}: {source}")]
    Validation {
        message: String,
        source: ValidationError,
    },

    /// A step failed; later steps did not run.
    #[error(transparent)]
    Step(#[from] StepError),

    /// Writing a success line to the output sink failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl GociError {
    /// The failed step, if this error came from one.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            GociError::Step(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this error is, or wraps, a [`ValidationError`].
    pub fn is_validation(&self) -> bool {
        find_cause::<ValidationError>(self).is_some()
    }
}

/// Walk `err` and its `source()` chain, returning the first `E` found.
pub fn find_cause<'a, E>(err: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    std::iter::successors(Some(err), |&e| e.source()).find_map(|e| e.downcast_ref::<E>())
}

/// Result type alias for goci operations.
pub type Result<T> = std::result::Result<T, GociError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn validation() -> GociError {
        GociError::Validation {
            message: "project directory is required".into(),
            source: ValidationError::MissingInput,
        }
    }

    #[test]
    fn validation_error_displays_message_and_sentinel() {
        assert_eq!(
            validation().to_string(),
            "project directory is required: validation failed"
        );
    }

    #[test]
    fn validation_is_found_through_source_chain() {
        let err = validation();
        assert!(err.is_validation());
        assert_eq!(
            find_cause::<ValidationError>(&err),
            Some(&ValidationError::MissingInput)
        );
    }

    /// Wraps another error the way a caller embedding goci might.
    #[derive(Debug, Error)]
    #[error("ci run failed")]
    struct RunFailed(#[source] GociError);

    #[test]
    fn validation_is_found_through_outer_wrapper() {
        let err = RunFailed(validation());
        assert_eq!(
            find_cause::<ValidationError>(&err),
            Some(&ValidationError::MissingInput)
        );
        assert!(find_cause::<StepError>(&err).is_none());
    }

    #[test]
    fn reported_issues_display_is_truncated() {
        let output = "unformatted.go\n".repeat(10_000);
        let cause = StepCause::ReportedIssues {
            output: output.clone(),
        };

        let shown = cause.to_string();
        assert!(shown.len() < MAX_DISPLAYED_OUTPUT + 100);
        let remaining = output.len() - MAX_DISPLAYED_OUTPUT;
        assert!(shown.ends_with(&format!("({} more bytes)", remaining)));
        match cause {
            StepCause::ReportedIssues { output: kept } => assert_eq!(kept, output),
            other => panic!("expected reported issues, got {:?}", other),
        }
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'a' shifts every 'é' onto an odd offset, so the cut lands mid-char.
        let output = format!("a{}", "é".repeat(MAX_DISPLAYED_OUTPUT));
        let shown = truncate_output(&output);
        assert!(shown.starts_with("aé"));
        assert!(shown.contains(&format!("({} more bytes)", output.len() - 1023)));
        assert!(shown.contains("more bytes"));
        assert_eq!(truncate_output("main.go"), "main.go");
    }

    #[test]
    fn step_error_is_not_validation() {
        let err = GociError::from(StepError::new(
            "go build",
            "go build failed",
            StepCause::Exit { code: Some(1) },
        ));
        assert!(!err.is_validation());
    }

    #[test]
    fn step_errors_match_on_step_name_only() {
        let actual = StepError::new(
            "go fmt",
            "failed",
            StepCause::ReportedIssues {
                output: "main.go".into(),
            },
        );
        assert_eq!(actual, StepError::named("go fmt"));
        assert_ne!(actual, StepError::named("go build"));
    }

    #[test]
    fn step_error_display_includes_step_message_and_cause() {
        let err = StepError::new("go test", "go test failed", StepCause::Exit { code: Some(2) });
        assert_eq!(
            err.to_string(),
            "Step: \"go test\": go test failed: Cause: exit status Some(2)"
        );
    }

    #[test]
    fn step_error_exposes_cause_as_source() {
        let err = StepError::new(
            "go fmt",
            "failed",
            StepCause::ReportedIssues {
                output: "bad.go".into(),
            },
        );
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("bad.go"));
        assert!(StepError::named("x").source().is_none());
    }

    #[test]
    fn timeout_cause_is_detected() {
        let err = StepError::new(
            "git push",
            "timed out",
            ProcessError::DeadlineExceeded {
                timeout: Duration::from_secs(10),
            },
        );
        assert!(err.is_timeout());
        assert!(!StepError::new("git push", "failed", StepCause::Exit { code: None }).is_timeout());
    }

    #[test]
    fn goci_error_exposes_step_error() {
        let err = GociError::from(StepError::named("git push"));
        assert_eq!(err.step_error(), Some(&StepError::named("git push")));
        assert!(validation().step_error().is_none());
    }

    #[test]
    fn output_error_wraps_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = GociError::Output(io_err);
        assert!(err.to_string().contains("failed to write output"));
        assert!(find_cause::<std::io::Error>(&err).is_some());
    }
}
