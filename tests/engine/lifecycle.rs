//! Transaction lifecycle
//!
//! Abort semantics, scope-exit cleanup, and the terminal-state rules:
//! terminal transitions happen once, repeats are no-ops, and conflicting
//! terminal operations are rejected without a state change.

use crate::common::{preloaded_db, val};
use lamina::{Database, IsolationLevel, TransactionState};

// ============================================================================
// Scope exit
// ============================================================================

#[test]
fn dropping_a_live_connection_aborts_its_transaction() {
    let db = Database::new();

    let t1 = db.begin();
    let t1_id = t1.id();
    t1.set("k", "x");
    drop(t1);

    let t2 = db.begin();
    assert_eq!(t2.get("k"), None);
    assert_eq!(db.transaction_state(t1_id), Some(TransactionState::Aborted));
}

#[test]
fn dropping_a_committed_connection_changes_nothing() {
    let db = Database::new();

    let t1 = db.begin();
    let t1_id = t1.id();
    t1.set("k", "x");
    assert!(t1.commit());
    drop(t1);

    assert_eq!(db.transaction_state(t1_id), Some(TransactionState::Committed));
    let t2 = db.begin();
    assert_eq!(t2.get("k"), val("x"));
}

#[test]
fn open_and_immediately_drop() {
    let db = Database::new();
    let id = {
        let conn = db.begin();
        conn.id()
    };
    assert_eq!(db.transaction_state(id), Some(TransactionState::Aborted));
}

// ============================================================================
// Abort
// ============================================================================

#[test]
fn abort_hides_writes_without_undo() {
    let db = preloaded_db(IsolationLevel::Snapshot);
    let t1 = db.begin();
    t1.set("k", "overwritten");
    t1.set("other", "new");
    t1.abort();
    assert_eq!(db.transaction_state(t1.id()), Some(TransactionState::Aborted));

    let t2 = db.begin();
    assert_eq!(t2.get("k"), val("val"));
    assert_eq!(t2.get("other"), None);
}

#[test]
fn abort_twice_is_a_noop() {
    let db = Database::new();
    let t1 = db.begin();
    t1.abort();
    t1.abort();
    assert_eq!(db.transaction_state(t1.id()), Some(TransactionState::Aborted));
}

#[test]
fn abort_after_commit_is_rejected() {
    let db = Database::new();
    let t1 = db.begin();
    t1.set("k", "v");
    assert!(t1.commit());
    t1.abort();
    assert_eq!(db.transaction_state(t1.id()), Some(TransactionState::Committed));

    let t2 = db.begin();
    assert_eq!(t2.get("k"), val("v"));
}

#[test]
fn commit_after_abort_is_rejected() {
    let db = Database::new();
    let t1 = db.begin();
    t1.set("k", "v");
    t1.abort();
    assert!(!t1.commit());
    assert_eq!(db.transaction_state(t1.id()), Some(TransactionState::Aborted));
}

#[test]
fn operations_on_a_terminal_transaction_are_inert() {
    let db = preloaded_db(IsolationLevel::Snapshot);
    let t1 = db.begin();
    t1.abort();

    assert_eq!(t1.get("k"), None);
    t1.set("k", "ignored");
    assert!(!t1.delete("k"));

    let t2 = db.begin();
    assert_eq!(t2.get("k"), val("val"));
}

// ============================================================================
// Pending summary
// ============================================================================

#[test]
fn pending_counts_distinct_keys() {
    let db = Database::new();
    let t1 = db.begin();
    assert!(t1.pending().is_empty());

    let _ = t1.get("a");
    let _ = t1.get("a");
    t1.set("b", "1");
    t1.set("b", "2");
    t1.set("c", "3");

    let pending = t1.pending();
    assert_eq!(pending.reads, 1);
    assert_eq!(pending.writes, 2);
    assert_eq!(pending.total(), 3);
}
