//! Execution context carried into a process invocation.

use std::time::{Duration, Instant};

/// Cancellation scope for one process invocation.
///
/// A background context never expires. A context built with
/// [`ExecContext::with_timeout`] expires once its deadline passes, and the
/// runner kills any process still running under it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecContext {
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl ExecContext {
    /// A context with no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            timeout: Some(timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The bound this context was created with.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
