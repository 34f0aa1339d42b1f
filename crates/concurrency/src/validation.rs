//! Commit-time validation
//!
//! At commit, a transaction is checked against the peers that were in
//! progress when it began. What gets checked, and what a conflict does to
//! the transaction, depends on the isolation level:
//!
//! | Level | Peers checked | Write-write | Read-write |
//! |-------|---------------|-------------|------------|
//! | `ReadCommitted` | none | — | — |
//! | `RepeatableRead` | none | — | — |
//! | `Snapshot` | committed peers | abort | — |
//! | `Serializable` | all peers | abort | refuse |
//!
//! "Abort" means the transaction must transition to `Aborted` and the
//! commit reports failure. "Refuse" means the commit reports failure but
//! the transaction stays `InProgress`: the caller may abort it or let
//! scope exit do so. Because peer key sets are retained whatever the
//! peer's fate, re-running the validation repeats the same refusal; the
//! way forward after a refusal is a fresh transaction.
//!
//! Peers are visited in ascending id order, so when several peers conflict
//! the reported peer and decision are deterministic.

use crate::conflict::{read_write_conflict, write_write_conflict, ConflictType};
use crate::transaction::{Transaction, TransactionTable};
use lamina_core::{IsolationLevel, TransactionState, TxnId};
use tracing::debug;

/// Outcome of validating a transaction for commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitDecision {
    /// No conflicting peer; the transaction may commit
    Commit,
    /// A write-write conflict was found; the transaction must abort
    Abort {
        /// The conflict that forced the abort
        conflict: ConflictType,
        /// The peer the conflict was detected against
        peer: TxnId,
    },
    /// A read-write conflict was found; the commit is refused but the
    /// transaction stays in progress
    Refuse {
        /// The conflict that blocked the commit
        conflict: ConflictType,
        /// The peer the conflict was detected against
        peer: TxnId,
    },
}

impl CommitDecision {
    /// Whether the decision allows the transaction to commit
    pub fn is_commit(&self) -> bool {
        matches!(self, CommitDecision::Commit)
    }
}

/// Validate `txn` for commit against the transaction table
///
/// Only peers recorded in `txn`'s concurrent-at-start set are considered:
/// a peer that began after `txn` will run its own validation against `txn`
/// when it commits, and anything that was already terminal at `txn`'s begin
/// cannot have raced it.
pub fn validate_commit(txn: &Transaction, table: &TransactionTable) -> CommitDecision {
    match txn.isolation() {
        // No validation: conflicts are either accepted (read committed) or
        // already prevented by the frozen read view (repeatable read).
        IsolationLevel::ReadCommitted | IsolationLevel::RepeatableRead => CommitDecision::Commit,
        IsolationLevel::Snapshot => validate_snapshot(txn, table),
        IsolationLevel::Serializable => validate_serializable(txn, table),
    }
}

/// First-committer-wins over write sets
///
/// Only peers that have already committed can defeat this transaction; a
/// peer still in progress will find this transaction committed when it runs
/// its own validation, and an aborted peer never conflicts.
fn validate_snapshot(txn: &Transaction, table: &TransactionTable) -> CommitDecision {
    for (&peer_id, peer) in concurrent_peers(txn, table) {
        if peer.state() != TransactionState::Committed {
            continue;
        }
        if let Some(key) = write_write_conflict(txn, peer) {
            debug!(txn = %txn.id(), peer = %peer_id, key = %key, "write-write conflict");
            return CommitDecision::Abort {
                conflict: ConflictType::WriteWrite { key },
                peer: peer_id,
            };
        }
    }
    CommitDecision::Commit
}

/// Write-write and read-write checks against every concurrent peer
///
/// Peer state does not matter here: a dependency on an in-progress peer is
/// just as serialization-breaking as one on a committed peer, and peer key
/// sets survive termination. Write-write aborts; read-write only refuses,
/// leaving the transaction in progress for its owner to clean up.
fn validate_serializable(txn: &Transaction, table: &TransactionTable) -> CommitDecision {
    for (&peer_id, peer) in concurrent_peers(txn, table) {
        if let Some(key) = write_write_conflict(txn, peer) {
            debug!(txn = %txn.id(), peer = %peer_id, key = %key, "write-write conflict");
            return CommitDecision::Abort {
                conflict: ConflictType::WriteWrite { key },
                peer: peer_id,
            };
        }
        if let Some(key) = read_write_conflict(txn, peer) {
            debug!(txn = %txn.id(), peer = %peer_id, key = %key, "read-write conflict");
            return CommitDecision::Refuse {
                conflict: ConflictType::ReadWrite { key },
                peer: peer_id,
            };
        }
    }
    CommitDecision::Commit
}

/// The transactions from `txn`'s concurrent-at-start set, ascending by id
fn concurrent_peers<'a>(
    txn: &'a Transaction,
    table: &'a TransactionTable,
) -> impl Iterator<Item = (&'a TxnId, &'a Transaction)> {
    txn.concurrent_at_start().iter().filter_map(move |id| {
        let peer = table.get(id);
        debug_assert!(peer.is_some(), "concurrent peer missing from table");
        peer.map(|p| (id, p))
    })
}
