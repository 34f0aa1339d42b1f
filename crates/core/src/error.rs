//! Error types for the lamina engine
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! The engine's operational surface deliberately reports failure through
//! return values rather than errors: `get` returns an empty option, `delete`
//! returns `false`, and `commit` returns `false` when validation refuses the
//! transaction. `Error` covers everything outside that narrow surface:
//! configuration parsing, misuse of terminal transactions, and the retry
//! helper giving up.
//!
//! ## Error Classification
//!
//! - **Temporal failures** (`TransactionAborted`): retryable; a fresh
//!   transaction may succeed against the new state.
//! - **Structural failures** (`Config`, `InvalidIsolation`,
//!   `TransactionNotActive`): require the caller to change something.

use crate::types::TransactionState;
use thiserror::Error;

/// Result type alias for lamina operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the lamina engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Configuration could not be parsed or validated
    #[error("invalid configuration: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// An isolation level string did not name a supported level
    #[error("invalid isolation level: {name:?}")]
    InvalidIsolation {
        /// The unrecognized level name
        name: String,
    },

    /// A transaction was aborted and not retried further
    ///
    /// Returned by the retry helper once its attempts are exhausted.
    /// This error is retryable from a fresh transaction.
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Why the transaction could not commit
        reason: String,
    },

    /// An operation was attempted on a transaction in a terminal state
    #[error("transaction not active (already {state})")]
    TransactionNotActive {
        /// The terminal state the transaction is in
        state: TransactionState,
    },
}

impl Error {
    /// Create a `Config` error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Create an `InvalidIsolation` error
    pub fn invalid_isolation(name: impl Into<String>) -> Self {
        Error::InvalidIsolation { name: name.into() }
    }

    /// Create a `TransactionAborted` error
    pub fn transaction_aborted(reason: impl Into<String>) -> Self {
        Error::TransactionAborted {
            reason: reason.into(),
        }
    }

    /// Create a `TransactionNotActive` error
    pub fn transaction_not_active(state: TransactionState) -> Self {
        Error::TransactionNotActive { state }
    }

    /// Check if this error is a conflict (retryable with a fresh transaction)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::TransactionAborted { .. })
    }

    /// Check if this error indicates caller misuse rather than contention
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::InvalidIsolation { .. }
                | Error::TransactionNotActive { .. }
        )
    }
}
