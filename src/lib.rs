//! goci - A local continuous-integration pipeline runner.
//!
//! goci runs a fixed sequence of external tools against a Go project
//! (build, test, format check, push), prints one success line per step and
//! stops at the first failure.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Pipeline construction and execution
//! - [`shell`] - External process execution
//! - [`steps`] - Step kinds and the `Executor` contract
//!
//! # Example
//!
//! ```
//! use goci::shell::{MockResponse, MockRunner};
//! use goci::StepError;
//!
//! let runner = MockRunner::new().with_response("gofmt -l .", MockResponse::output("main.go"));
//! let mut out = Vec::<u8>::new();
//!
//! let err = goci::run_with("./proj", &mut out, &runner).unwrap_err();
//!
//! assert_eq!(err.step_error(), Some(&StepError::named("go fmt")));
//! assert_eq!(out, b"Go Build:SUCCESS\nGo Test:SUCCESS\n");
//! ```

pub mod cli;
pub mod error;
pub mod runner;
pub mod shell;
pub mod steps;

pub use error::{GociError, Result, StepError, ValidationError};
pub use runner::{run, run_with, Pipeline};
