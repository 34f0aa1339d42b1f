//! Foundational types for the lamina engine
//!
//! This module defines:
//! - `TxnId`: Transaction identity, allocated in strictly increasing order
//! - `IsolationLevel`: The four supported isolation levels
//! - `TransactionState`: Transaction lifecycle states
//! - `Key`: The opaque storage key

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a transaction
///
/// A `TxnId` wraps a 64-bit integer allocated by the database in strictly
/// increasing order, starting at 1. The value 0 is reserved as
/// [`TxnId::INVALID`], the sentinel meaning "no such transaction"; a version
/// record whose end id is `INVALID` has not been deleted or overwritten.
///
/// Ids order transactions by creation time: `a < b` means `a` began before
/// `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxnId(u64);

impl TxnId {
    /// The reserved sentinel id. Never assigned to a transaction.
    pub const INVALID: TxnId = TxnId(0);

    /// The first id the database assigns.
    pub const FIRST: TxnId = TxnId(1);

    /// Create a `TxnId` from a raw integer
    pub const fn new(raw: u64) -> Self {
        TxnId(raw)
    }

    /// Get the raw integer value
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Check that this id identifies a real transaction (not the sentinel)
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The id following this one
    ///
    /// # Panics
    ///
    /// Panics if the id counter reaches `u64::MAX` (overflow).
    pub fn next(self) -> TxnId {
        TxnId(
            self.0
                .checked_add(1)
                .expect("transaction id overflow: u64::MAX reached"),
        )
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Isolation level of a transaction
///
/// Selects which visibility variant governs the transaction's reads and
/// which validation applies at commit:
///
/// | Level | Reads | Commit validation |
/// |-------|-------|-------------------|
/// | `ReadCommitted` | latest committed state | none |
/// | `RepeatableRead` | snapshot frozen at begin | none |
/// | `Snapshot` | snapshot frozen at begin | write-write vs. committed peers |
/// | `Serializable` | snapshot frozen at begin | write-write and read-write vs. all peers |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Each read observes the latest committed version at read time.
    ReadCommitted,
    /// Reads are frozen to the state observed at begin; no commit validation.
    RepeatableRead,
    /// Frozen reads plus first-committer-wins on write sets.
    Snapshot,
    /// Frozen reads plus write-write and read-write conflict checks.
    Serializable,
}

impl IsolationLevel {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "read_committed",
            IsolationLevel::RepeatableRead => "repeatable_read",
            IsolationLevel::Snapshot => "snapshot",
            IsolationLevel::Serializable => "serializable",
        }
    }

    /// Parse an isolation level from its string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read_committed" => Some(IsolationLevel::ReadCommitted),
            "repeatable_read" => Some(IsolationLevel::RepeatableRead),
            "snapshot" => Some(IsolationLevel::Snapshot),
            "serializable" => Some(IsolationLevel::Serializable),
            _ => None,
        }
    }

    /// Whether reads under this level use the snapshot captured at begin
    ///
    /// `ReadCommitted` is the only level that re-reads transaction states
    /// with an empty snapshot, so freshly committed peer writes become
    /// visible mid-transaction.
    pub fn uses_begin_snapshot(&self) -> bool {
        !matches!(self, IsolationLevel::ReadCommitted)
    }
}

impl Default for IsolationLevel {
    fn default() -> Self {
        IsolationLevel::Snapshot
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a transaction
///
/// State transitions:
/// - `InProgress` → `Committed` (successful commit)
/// - `InProgress` → `Aborted` (explicit abort, conflict, or scope exit)
///
/// `Committed` and `Aborted` are terminal; once reached the state never
/// changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// The transaction is live and may read, write, commit, or abort.
    InProgress,
    /// The transaction committed; its writes are visible to others.
    Committed,
    /// The transaction aborted; its writes are never visible to others.
    Aborted,
}

impl TransactionState {
    /// Check whether this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionState::InProgress)
    }

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::InProgress => "in_progress",
            TransactionState::Committed => "committed",
            TransactionState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage key
///
/// Keys are opaque UTF-8 strings; the engine never interprets their
/// contents. Equality and ordering are bytewise, so set membership in the
/// read/write sets and map lookups agree with each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(String);

impl Key {
    /// Create a key from anything string-like
    pub fn new(raw: impl Into<String>) -> Self {
        Key(raw.into())
    }

    /// View the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, yielding the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
