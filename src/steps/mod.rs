//! Pipeline steps.
//!
//! Every step implements [`Executor`] and wraps a single external process:
//!
//! - [`Step`] - succeeds when the process exits 0
//! - [`ExceptionStep`] - additionally fails if the process prints anything
//! - [`TimeoutStep`] - kills the process if it overruns its deadline
//!
//! # Example
//!
//! ```
//! use goci::shell::{MockResponse, MockRunner};
//! use goci::steps::{ExceptionStep, Executor};
//!
//! let step = ExceptionStep::new("go fmt", "gofmt", "Gofmt:SUCCESS", ".", ["-l", "."]);
//!
//! let clean = MockRunner::new();
//! assert_eq!(step.execute(&clean).unwrap(), "Gofmt:SUCCESS");
//!
//! let dirty = MockRunner::new().with_response("gofmt -l .", MockResponse::output("main.go"));
//! assert!(step.execute(&dirty).is_err());
//! ```

pub mod exception;
pub mod step;
pub mod timeout;

pub use exception::ExceptionStep;
pub use step::{Executor, Step};
pub use timeout::TimeoutStep;
