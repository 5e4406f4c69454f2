//! Scripted process runner for testing.
//!
//! `MockRunner` implements [`ProcessRunner`] without spawning anything. Each
//! command line can be given a [`MockResponse`]; unscripted commands exit 0
//! silently. Every invocation is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use goci::shell::{ExecContext, Invocation, MockResponse, MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new().with_response("go build . errors", MockResponse::exit(1));
//!
//! let inv = Invocation {
//!     program: "go".into(),
//!     args: vec!["build".into(), ".".into(), "errors".into()],
//!     cwd: ".".into(),
//!     capture_output: false,
//! };
//! let result = runner.run(&inv, &ExecContext::background()).unwrap();
//!
//! assert!(!result.success);
//! assert_eq!(runner.command_lines(), vec!["go build . errors".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use super::command::{CommandResult, Invocation, ProcessError, ProcessRunner};
use super::context::ExecContext;

/// Scripted outcome for one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Run to completion with this exit code and captured output.
    Exit { code: i32, output: String },

    /// Fail to start, as if the program were not installed.
    LaunchFailure,

    /// Never finish: reported as a deadline overrun when the context has a
    /// deadline, otherwise as a clean exit.
    Hang,
}

impl MockResponse {
    pub fn exit(code: i32) -> Self {
        MockResponse::Exit {
            code,
            output: String::new(),
        }
    }

    /// Exit 0 after printing `output`.
    pub fn output(output: &str) -> Self {
        MockResponse::Exit {
            code: 0,
            output: output.to_string(),
        }
    }
}

/// Process runner returning scripted results.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, MockResponse>,
    invocations: RefCell<Vec<Invocation>>,
    contexts: RefCell<Vec<ExecContext>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for a command line such as `"go test -v"`.
    pub fn with_response(mut self, command_line: &str, response: MockResponse) -> Self {
        self.responses.insert(command_line.to_string(), response);
        self
    }

    /// All invocations received, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Command lines received, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Execution contexts received, parallel to [`MockRunner::invocations`].
    pub fn contexts(&self) -> Vec<ExecContext> {
        self.contexts.borrow().clone()
    }
}

impl ProcessRunner for MockRunner {
    fn run(
        &self,
        invocation: &Invocation,
        ctx: &ExecContext,
    ) -> Result<CommandResult, ProcessError> {
        self.invocations.borrow_mut().push(invocation.clone());
        self.contexts.borrow_mut().push(*ctx);

        let response = self
            .responses
            .get(&invocation.command_line())
            .cloned()
            .unwrap_or_else(|| MockResponse::exit(0));

        match response {
            MockResponse::Exit { code, output } => {
                let output = if invocation.capture_output {
                    output
                } else {
                    String::new()
                };
                if code == 0 {
                    Ok(CommandResult::success(output, Duration::ZERO))
                } else {
                    Ok(CommandResult::failure(Some(code), output, Duration::ZERO))
                }
            }
            MockResponse::LaunchFailure => Err(ProcessError::Launch {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
            MockResponse::Hang => match ctx.timeout() {
                Some(timeout) => Err(ProcessError::DeadlineExceeded { timeout }),
                None => Ok(CommandResult::success(String::new(), Duration::ZERO)),
            },
        }
    }
}
