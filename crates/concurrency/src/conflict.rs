//! Conflict detection between transaction pairs
//!
//! Two kinds of conflict matter at commit time:
//!
//! - **Write-write**: both transactions wrote (or deleted) the same key.
//! - **Read-write**: one transaction read a key the other wrote, in either
//!   direction.
//!
//! Detection is plain set intersection over the transactions' accumulated
//! key sets. The sets are ordered, so the reported key is always the
//! smallest conflicting one and detection is deterministic.

use crate::transaction::Transaction;
use lamina_core::Key;
use std::collections::BTreeSet;
use std::fmt;

/// A detected conflict between two transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Both transactions wrote the same key
    WriteWrite {
        /// The contested key
        key: Key,
    },
    /// One transaction read a key the other wrote
    ReadWrite {
        /// The contested key
        key: Key,
    },
}

impl ConflictType {
    /// The key the conflict was detected on
    pub fn key(&self) -> &Key {
        match self {
            ConflictType::WriteWrite { key } => key,
            ConflictType::ReadWrite { key } => key,
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::WriteWrite { key } => write!(f, "write-write conflict on {:?}", key.as_str()),
            ConflictType::ReadWrite { key } => write!(f, "read-write conflict on {:?}", key.as_str()),
        }
    }
}

fn first_common(a: &BTreeSet<Key>, b: &BTreeSet<Key>) -> Option<Key> {
    a.intersection(b).next().cloned()
}

/// Find a write-write conflict between two transactions
///
/// Returns the smallest key present in both write sets, or `None` when the
/// write sets are disjoint.
pub fn write_write_conflict(a: &Transaction, b: &Transaction) -> Option<Key> {
    first_common(a.write_set(), b.write_set())
}

/// Find a read-write conflict between two transactions
///
/// Symmetric: checks `a`'s writes against `b`'s reads, then `a`'s reads
/// against `b`'s writes. Returns the first conflicting key found, or `None`
/// when neither direction intersects.
pub fn read_write_conflict(a: &Transaction, b: &Transaction) -> Option<Key> {
    first_common(a.write_set(), b.read_set()).or_else(|| first_common(a.read_set(), b.write_set()))
}
