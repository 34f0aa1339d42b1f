//! Transaction retry helper
//!
//! The engine never retries on its own: a refused or aborted commit simply
//! reports `false`, and the embedder decides what to do next. This module
//! is the convenience most embedders want anyway: run a closure inside a
//! fresh transaction, and when the commit loses to a conflict, run it again
//! against the new state after a pause.
//!
//! Every attempt is a whole new transaction. Retrying the same transaction
//! would be pointless: a refusal re-validates against the same frozen key
//! sets and repeats itself, and an aborted transaction is terminal.

use crate::connection::Connection;
use crate::database::Database;
use lamina_core::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Retry policy for [`Database::run_transaction`]
///
/// Bounds how many fresh transactions the helper will open for one piece
/// of work, and how long it pauses between them. The pause doubles after
/// every lost commit until it reaches `backoff_cap`.
///
/// # Example
/// ```
/// use lamina_engine::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default()
///     .attempts(6)
///     .backoff(Duration::from_millis(2));
/// assert_eq!(config.max_attempts, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of transactions to attempt, including the first.
    /// Treated as at least 1.
    pub max_attempts: u32,
    /// Pause before the first retry; doubles on each one after that.
    pub backoff: Duration,
    /// Upper bound on the pause between attempts.
    pub backoff_cap: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff: Duration::from_millis(5),
            backoff_cap: Duration::from_millis(250),
        }
    }
}

impl RetryConfig {
    /// Policy that gives up after the first lost commit
    pub fn once() -> Self {
        Self::default().attempts(1)
    }

    /// Set the total number of attempts (clamped to at least 1)
    pub fn attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the pause before the first retry
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the upper bound on the pause between attempts
    pub fn backoff_cap(mut self, backoff_cap: Duration) -> Self {
        self.backoff_cap = backoff_cap;
        self
    }

    /// Pause before retry number `retry` (zero-based)
    fn pause_before(&self, retry: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.backoff_cap)
    }
}

impl Database {
    /// Run a closure inside a transaction, retrying on commit conflicts
    ///
    /// Begins a transaction at the database's default isolation level,
    /// runs `op`, and commits. When the commit loses to a conflict the
    /// transaction is aborted and the closure runs again in a fresh
    /// transaction after a pause, until a commit succeeds or
    /// `config.max_attempts` transactions have been spent.
    ///
    /// The closure must be safe to run multiple times; side effects outside
    /// the transaction are the caller's problem.
    ///
    /// # Errors
    ///
    /// Returns `Error::TransactionAborted` once the attempts are exhausted,
    /// or whatever error `op` itself returns (the transaction is aborted by
    /// scope exit in that case, without retrying).
    pub fn run_transaction<T, F>(&self, config: &RetryConfig, mut op: F) -> Result<T>
    where
        F: FnMut(&Connection) -> Result<T>,
    {
        let attempts = config.max_attempts.max(1);
        for attempt in 0..attempts {
            let conn = self.begin();
            let out = op(&conn)?;
            if conn.commit() {
                return Ok(out);
            }
            // Refused commits stay in progress; make the failure terminal
            // before moving on.
            conn.abort();

            if attempt + 1 < attempts {
                let pause = config.pause_before(attempt);
                debug!(
                    attempt = attempt + 1,
                    pause_ms = pause.as_millis() as u64,
                    "commit lost, retrying in a fresh transaction"
                );
                std::thread::sleep(pause);
            }
        }
        Err(Error::transaction_aborted(format!(
            "commit failed after {} attempt(s)",
            attempts
        )))
    }
}
