//! Connection: a scoped handle to one transaction
//!
//! A connection binds one transaction to the shared database state and
//! exposes the operational surface: `get`, `set`, `delete`, `commit`,
//! `abort`. Failure is reported through return values, not errors: a `get`
//! with nothing visible is `None`, a `delete` of an absent key is `false`,
//! and a `commit` that cannot validate is `false`.
//!
//! Dropping a connection whose transaction is still in progress aborts the
//! transaction, so a transaction can never leak in a live state. The
//! transaction record itself stays in the database forever; only the handle
//! goes away.

use crate::database::DatabaseInner;
use lamina_concurrency::{is_visible, validate_commit, CommitDecision, VersionRecord};
use lamina_core::{IsolationLevel, Key, TransactionState, TxnId, Value};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Counts of the keys a transaction has touched so far
///
/// A summary of what would be discarded if the transaction aborted now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingOperations {
    /// Number of distinct keys read
    pub reads: usize,
    /// Number of distinct keys written or deleted
    pub writes: usize,
}

impl PendingOperations {
    /// Total number of distinct keys touched
    pub fn total(&self) -> usize {
        self.reads + self.writes
    }

    /// Check if the transaction has touched nothing
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A scoped handle to one transaction in the database
///
/// The connection carries the transaction's id plus a shared handle to the
/// database interior; every operation is one atomic step against that
/// state. Interleave operations from several live connections to simulate
/// concurrency.
#[derive(Debug)]
pub struct Connection {
    inner: Arc<RwLock<DatabaseInner>>,
    id: TxnId,
}

impl Connection {
    pub(crate) fn new(inner: Arc<RwLock<DatabaseInner>>, id: TxnId) -> Self {
        Connection { inner, id }
    }

    /// Id of the transaction this connection is bound to
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Isolation level of the bound transaction
    pub fn isolation(&self) -> Option<IsolationLevel> {
        self.inner.read().txns.get(&self.id).map(|t| t.isolation())
    }

    /// Current state of the bound transaction
    pub fn state(&self) -> Option<TransactionState> {
        self.inner.read().txns.get(&self.id).map(|t| t.state())
    }

    /// Counts of the keys the bound transaction has read and written
    pub fn pending(&self) -> PendingOperations {
        let inner = self.inner.read();
        match inner.txns.get(&self.id) {
            Some(t) => PendingOperations {
                reads: t.read_set().len(),
                writes: t.write_set().len(),
            },
            None => PendingOperations::default(),
        }
    }

    /// Read the value visible to this transaction for `key`
    ///
    /// The key joins the read set whether or not anything is visible: a
    /// read that found nothing is still a dependency the serializable
    /// validation has to defend.
    ///
    /// The chain is scanned newest-first and the first visible record wins;
    /// the transaction's own pending write, if any, sits at the tail and is
    /// found first.
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let Some(txn) = inner.txns.get_mut(&self.id) else {
            return None;
        };
        if !txn.is_in_progress() {
            warn!(txn = %self.id, key = %key, "ignoring read on a terminal transaction");
            return None;
        }
        txn.record_read(key.clone());

        let txn = inner.txns.get(&self.id)?;
        let chain = inner.store.get(&key)?;
        let result = chain
            .newest_first()
            .find(|record| is_visible(record, txn, &inner.txns))
            .map(|record| record.value().clone());
        result
    }

    /// Write `value` under `key`
    ///
    /// Every record currently visible to this transaction is terminated
    /// (at most one exists under the chain invariants, but the scan is
    /// exhaustive to cover concurrent terminations), the key joins the
    /// write set, and a fresh live record is appended. The chain is created
    /// on first reference. Writing does not touch the read set.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let txns = &inner.txns;
        let Some(txn) = txns.get(&self.id) else {
            return;
        };
        if !txn.is_in_progress() {
            warn!(txn = %self.id, key = %key, "ignoring write on a terminal transaction");
            return;
        }

        let chain = inner.store.entry(key.clone()).or_default();
        for record in chain.records_mut() {
            if is_visible(record, txn, txns) {
                record.terminate(self.id);
            }
        }
        chain.push(VersionRecord::new(value, self.id));

        if let Some(txn) = inner.txns.get_mut(&self.id) {
            txn.record_write(key);
        }
    }

    /// Delete `key`
    ///
    /// Returns `false` when no chain exists for the key. Otherwise every
    /// record visible to this transaction is terminated, the key joins the
    /// write set, and the call returns `true`; no tombstone is appended,
    /// absence of a visible record is what deletion looks like to readers.
    ///
    /// A chain with no visible record still yields `true`: the chain-map
    /// entry is the only gate.
    pub fn delete(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let txns = &inner.txns;
        let Some(txn) = txns.get(&self.id) else {
            return false;
        };
        if !txn.is_in_progress() {
            warn!(txn = %self.id, key = %key, "ignoring delete on a terminal transaction");
            return false;
        }

        let Some(chain) = inner.store.get_mut(&key) else {
            return false;
        };
        for record in chain.records_mut() {
            if is_visible(record, txn, txns) {
                record.terminate(self.id);
            }
        }

        if let Some(txn) = inner.txns.get_mut(&self.id) {
            txn.record_write(key);
        }
        true
    }

    /// Try to commit the bound transaction
    ///
    /// Validation depends on the isolation level; see
    /// [`lamina_concurrency::validate_commit`]. On success the transaction
    /// is `Committed` and the call returns `true`. A write-write conflict
    /// aborts the transaction and returns `false`. A serializable
    /// read-write conflict returns `false` but leaves the transaction in
    /// progress: commit refused, and since peer key sets are never pruned a
    /// repeated commit refuses again. Abort and rerun the work in a fresh
    /// transaction (or let scope exit abort it).
    ///
    /// Committing a terminal transaction is rejected and returns `false`.
    pub fn commit(&self) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let Some(txn) = inner.txns.get(&self.id) else {
            return false;
        };
        if !txn.is_in_progress() {
            warn!(txn = %self.id, state = %txn.state(), "commit on a terminal transaction");
            return false;
        }

        let decision = validate_commit(txn, &inner.txns);
        let Some(txn) = inner.txns.get_mut(&self.id) else {
            return false;
        };
        match decision {
            CommitDecision::Commit => {
                txn.mark_committed();
                debug!(txn = %self.id, "committed");
                true
            }
            CommitDecision::Abort { conflict, peer } => {
                txn.mark_aborted();
                debug!(txn = %self.id, %peer, %conflict, "aborted at commit");
                false
            }
            CommitDecision::Refuse { conflict, peer } => {
                debug!(txn = %self.id, %peer, %conflict, "commit refused, transaction still in progress");
                false
            }
        }
    }

    /// Abort the bound transaction
    ///
    /// Nothing is undone: terminated records keep their end marks and
    /// appended records stay in their chains. The visibility rules already
    /// hide everything an aborted transaction wrote. Aborting twice is a
    /// no-op; aborting a committed transaction is rejected without a state
    /// change.
    pub fn abort(&self) {
        let mut inner = self.inner.write();
        if let Some(txn) = inner.txns.get_mut(&self.id) {
            txn.mark_aborted();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let mut inner = self.inner.write();
        if let Some(txn) = inner.txns.get_mut(&self.id) {
            if txn.is_in_progress() {
                debug!(txn = %self.id, "connection dropped, aborting transaction");
                txn.mark_aborted();
            }
        }
    }
}
