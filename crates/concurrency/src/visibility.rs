//! Version visibility rules
//!
//! The oracle answers one question: is a given version record visible to a
//! given transaction's reads? It is a pure predicate over the record, the
//! reading transaction, and the states of other transactions at the instant
//! of the read. Two variants exist, selected by the reader's isolation
//! level:
//!
//! - **Snapshot variant** (`RepeatableRead`, `Snapshot`, `Serializable`):
//!   the reader's view is frozen at begin. Writers that were in progress at
//!   begin stay invisible forever, even after they commit; writers that
//!   began later are invisible outright.
//! - **Latest-committed variant** (`ReadCommitted`): no snapshot is
//!   retained. A version is visible as soon as its writer commits, whenever
//!   that writer began, and stays visible until a committed terminator
//!   supersedes it.
//!
//! Both variants consult transaction states at read time, not at begin.
//! For the snapshot levels this still yields a stable view: any writer that
//! commits after the reader began was in the reader's concurrent set and is
//! filtered by that rule, and anything outside the set was already terminal
//! at begin.

use crate::transaction::{Transaction, TransactionTable};
use crate::version::VersionRecord;
use lamina_core::{IsolationLevel, TransactionState, TxnId};
use std::collections::BTreeMap;

/// Read-time lookup of transaction states
///
/// The oracle only needs one fact about other transactions: their lifecycle
/// state right now. Keeping that behind a trait keeps the predicate pure
/// and testable against hand-built state maps.
pub trait TxnStates {
    /// State of the transaction with the given id, if it is known
    fn state_of(&self, id: TxnId) -> Option<TransactionState>;

    /// Whether the transaction with the given id has committed
    fn is_committed(&self, id: TxnId) -> bool {
        self.state_of(id) == Some(TransactionState::Committed)
    }
}

impl TxnStates for TransactionTable {
    fn state_of(&self, id: TxnId) -> Option<TransactionState> {
        self.get(&id).map(|t| t.state())
    }
}

impl TxnStates for BTreeMap<TxnId, TransactionState> {
    fn state_of(&self, id: TxnId) -> Option<TransactionState> {
        self.get(&id).copied()
    }
}

/// Decide whether `record` is visible to `txn`, per its isolation level
pub fn is_visible<S: TxnStates>(record: &VersionRecord, txn: &Transaction, states: &S) -> bool {
    match txn.isolation() {
        IsolationLevel::ReadCommitted => visible_latest_committed(record, txn, states),
        IsolationLevel::RepeatableRead
        | IsolationLevel::Snapshot
        | IsolationLevel::Serializable => visible_in_snapshot(record, txn, states),
    }
}

/// Snapshot variant: the view frozen at the reader's begin
///
/// A record is invisible when any of these holds, checked in order:
/// 1. Its writer began after the reader (`start_txn > txn.id`).
/// 2. Its writer was in progress when the reader began.
/// 3. Its writer is someone else and has not committed.
/// 4. The reader itself terminated it (overwrote or deleted it).
/// 5. It was superseded before the reader began: the terminator is a
///    committed transaction older than the reader and not concurrent with
///    it at begin.
///
/// Otherwise the record is visible. The reader's own live writes pass every
/// rule, so a transaction always reads what it wrote.
pub fn visible_in_snapshot<S: TxnStates>(
    record: &VersionRecord,
    txn: &Transaction,
    states: &S,
) -> bool {
    let start = record.start_txn();
    let end = record.end_txn();

    if start > txn.id() {
        return false;
    }
    if txn.was_concurrent_at_start(start) {
        return false;
    }
    if start != txn.id() && !states.is_committed(start) {
        return false;
    }
    if end == txn.id() {
        return false;
    }
    if end.is_valid()
        && end < txn.id()
        && !txn.was_concurrent_at_start(end)
        && states.is_committed(end)
    {
        return false;
    }
    true
}

/// Latest-committed variant: no snapshot retention
///
/// A record is visible when its writer is the reader itself, or when the
/// writer has committed (at read time, regardless of when it began) and no
/// committed terminator supersedes the record. The reader's own
/// terminations still hide the record, so read-your-writes holds here too.
pub fn visible_latest_committed<S: TxnStates>(
    record: &VersionRecord,
    txn: &Transaction,
    states: &S,
) -> bool {
    let start = record.start_txn();
    let end = record.end_txn();

    if end == txn.id() {
        return false;
    }
    if start == txn.id() {
        return true;
    }
    if !states.is_committed(start) {
        return false;
    }
    if !end.is_valid() {
        return true;
    }
    // A committed terminator means a newer committed version (or a committed
    // delete) supersedes this record. An uncommitted or aborted terminator
    // leaves it readable.
    !states.is_committed(end)
}
