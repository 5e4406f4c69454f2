//! External process execution.

pub mod command;
pub mod context;
pub mod mock;

pub use command::{CommandResult, Invocation, ProcessError, ProcessRunner, SystemRunner};
pub use context::ExecContext;
pub use mock::{MockResponse, MockRunner};
