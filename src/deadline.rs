//! A single time budget shared by every step of a command.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{
    Error,
    Result,
};

/// Default budget for a full command run.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for shell completion, which runs inside the shell's key handler.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(5);

/// A point in time after which remaining work is abandoned.
///
/// Futures run through [`Deadline::run`] are dropped when the deadline
/// passes, which kills any child process spawned with `kill_on_drop`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    /// Must be called from within a tokio runtime.
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now() + limit,
            limit,
        }
    }

    /// Await `fut`, failing with [`Error::Timeout`] once the deadline has
    /// passed.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| Error::Timeout(self.limit))?
    }
}
