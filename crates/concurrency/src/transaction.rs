//! Transaction entity and lifecycle
//!
//! A `Transaction` carries everything the engine needs to answer visibility
//! and validation questions about it later, possibly long after the owning
//! connection is gone: its identity, isolation level, lifecycle state, the
//! set of transactions that were in progress when it began, and the keys it
//! has read and written.
//!
//! State transitions:
//! - `InProgress` → `Committed` (successful commit)
//! - `InProgress` → `Aborted` (explicit abort, conflict, or scope exit)
//!
//! Terminal states never change. Repeating a terminal transition is a no-op;
//! aborting a committed transaction (or vice versa) is rejected.

use lamina_core::{IsolationLevel, Key, TransactionState, TxnId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// The database's registry of every transaction it has ever created
///
/// Keyed by id, so iteration is ascending creation order. Entries are never
/// pruned: visibility decisions consult the states of arbitrarily old
/// transactions.
pub type TransactionTable = BTreeMap<TxnId, Transaction>;

/// A single transaction
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TxnId,
    isolation: IsolationLevel,
    state: TransactionState,
    concurrent_at_start: BTreeSet<TxnId>,
    read_set: BTreeSet<Key>,
    write_set: BTreeSet<Key>,
}

impl Transaction {
    /// Create a transaction in the `InProgress` state
    ///
    /// `concurrent_at_start` must be the ids of every other transaction that
    /// was `InProgress` at the instant of creation. It is captured once and
    /// immutable afterwards; together with the id it freezes the snapshot
    /// the visibility rules work from.
    pub fn new(
        id: TxnId,
        isolation: IsolationLevel,
        concurrent_at_start: BTreeSet<TxnId>,
    ) -> Self {
        debug_assert!(id.is_valid(), "transaction id must be positive");
        debug_assert!(
            !concurrent_at_start.contains(&id),
            "a transaction is never concurrent with itself"
        );
        Transaction {
            id,
            isolation,
            state: TransactionState::InProgress,
            concurrent_at_start,
            read_set: BTreeSet::new(),
            write_set: BTreeSet::new(),
        }
    }

    /// The transaction's id
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// The transaction's isolation level
    pub fn isolation(&self) -> IsolationLevel {
        self.isolation
    }

    /// The transaction's current lifecycle state
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Whether the transaction is still live
    pub fn is_in_progress(&self) -> bool {
        self.state == TransactionState::InProgress
    }

    /// Ids of transactions that were in progress when this one began
    pub fn concurrent_at_start(&self) -> &BTreeSet<TxnId> {
        &self.concurrent_at_start
    }

    /// Whether `other` was in progress when this transaction began
    pub fn was_concurrent_at_start(&self, other: TxnId) -> bool {
        self.concurrent_at_start.contains(&other)
    }

    /// Keys whose version chains this transaction has consulted
    pub fn read_set(&self) -> &BTreeSet<Key> {
        &self.read_set
    }

    /// Keys whose version chains this transaction has extended or terminated
    pub fn write_set(&self) -> &BTreeSet<Key> {
        &self.write_set
    }

    /// Record that the transaction read `key`
    pub fn record_read(&mut self, key: Key) {
        self.read_set.insert(key);
    }

    /// Record that the transaction wrote or deleted `key`
    pub fn record_write(&mut self, key: Key) {
        self.write_set.insert(key);
    }

    /// Transition to `Committed`
    ///
    /// Returns `true` if the transaction is committed after the call.
    /// Rejected (with a warning, no state change) once the transaction is
    /// aborted; repeating a commit is a no-op.
    pub fn mark_committed(&mut self) -> bool {
        match self.state {
            TransactionState::InProgress => {
                self.state = TransactionState::Committed;
                true
            }
            TransactionState::Committed => true,
            TransactionState::Aborted => {
                warn!(txn = %self.id, "ignoring commit of an aborted transaction");
                false
            }
        }
    }

    /// Transition to `Aborted`
    ///
    /// Returns `true` if the transaction is aborted after the call.
    /// Rejected (with a warning, no state change) once the transaction is
    /// committed; repeating an abort is a no-op.
    pub fn mark_aborted(&mut self) -> bool {
        match self.state {
            TransactionState::InProgress => {
                self.state = TransactionState::Aborted;
                true
            }
            TransactionState::Aborted => true,
            TransactionState::Committed => {
                warn!(txn = %self.id, "ignoring abort of a committed transaction");
                false
            }
        }
    }
}
