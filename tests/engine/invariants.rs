//! Universal invariants
//!
//! Properties that hold at every isolation level: id allocation, version
//! record bounds, read-your-writes, and the fate of aborted writes.

use crate::common::val;
use lamina::{Database, IsolationLevel, TransactionState, TxnId};
use lamina_concurrency::{VersionChain, VersionRecord};
use lamina_core::Value;

// The engine is single-threaded cooperative, but handles must still be
// movable across threads for embedders that own the database elsewhere.
static_assertions::assert_impl_all!(Database: Send, Sync, Clone);

const ALL_LEVELS: [IsolationLevel; 4] = [
    IsolationLevel::ReadCommitted,
    IsolationLevel::RepeatableRead,
    IsolationLevel::Snapshot,
    IsolationLevel::Serializable,
];

#[test]
fn transaction_ids_are_positive_unique_and_increasing() {
    let db = Database::new();
    let mut previous = TxnId::INVALID;
    for _ in 0..100 {
        let conn = db.begin();
        assert!(conn.id().is_valid());
        assert!(conn.id() > previous);
        previous = conn.id();
    }
    assert_eq!(db.transaction_count(), 100);
}

#[test]
fn version_records_never_end_before_they_start() {
    // Termination always comes from a transaction that can see the record,
    // and a record is only visible to transactions at least as young as
    // its writer.
    let mut chain = VersionChain::new();
    chain.push(VersionRecord::new(Value::new("v"), TxnId::new(3)));
    for record in chain.records_mut() {
        record.terminate(TxnId::new(7));
    }
    for record in chain.records() {
        assert!(record.start_txn().is_valid());
        assert!(record.end_txn() == TxnId::INVALID || record.end_txn() >= record.start_txn());
    }
}

#[test]
fn commit_result_matches_final_state() {
    // true -> Committed; false with a write conflict -> Aborted.
    let db = Database::with_isolation(IsolationLevel::Snapshot);
    let winner = db.begin();
    let loser = db.begin();
    winner.set("k", "w");
    loser.set("k", "l");

    assert!(winner.commit());
    assert_eq!(
        db.transaction_state(winner.id()),
        Some(TransactionState::Committed)
    );

    assert!(!loser.commit());
    assert_eq!(
        db.transaction_state(loser.id()),
        Some(TransactionState::Aborted)
    );
}

#[test]
fn snapshot_levels_never_observe_concurrent_writers() {
    for isolation in [
        IsolationLevel::RepeatableRead,
        IsolationLevel::Snapshot,
        IsolationLevel::Serializable,
    ] {
        let db = Database::with_isolation(isolation);
        let peer = db.begin();
        let reader = db.begin();

        peer.set("k", "peer-write");
        assert!(peer.commit());

        // The peer was in progress at the reader's begin; its commit must
        // stay invisible for the reader's whole lifetime.
        assert_eq!(reader.get("k"), None, "leak at {isolation}");
    }
}

#[test]
fn transactions_always_read_their_own_writes() {
    for isolation in ALL_LEVELS {
        let db = Database::with_isolation(isolation);
        let conn = db.begin();
        conn.set("k", "mine");
        assert_eq!(conn.get("k"), val("mine"), "lost write at {isolation}");
    }
}

#[test]
fn aborted_writes_are_never_observed() {
    for isolation in ALL_LEVELS {
        let db = Database::with_isolation(isolation);
        let doomed = db.begin();
        doomed.set("k", "doomed");
        doomed.abort();

        let reader = db.begin();
        assert_eq!(reader.get("k"), None, "aborted write leaked at {isolation}");
    }
}

#[test]
fn delete_then_get_in_one_transaction_returns_none() {
    for isolation in ALL_LEVELS {
        let db = Database::with_isolation(isolation);
        let setup = db.begin();
        setup.set("k", "v");
        assert!(setup.commit());

        let conn = db.begin();
        assert!(conn.delete("k"));
        assert_eq!(conn.get("k"), None, "delete not seen at {isolation}");
    }
}

#[test]
fn dropped_connection_leaves_an_aborted_transaction() {
    let db = Database::new();
    let id = {
        let conn = db.begin();
        conn.id()
    };
    assert_eq!(db.transaction_state(id), Some(TransactionState::Aborted));
}

#[test]
fn chains_survive_everything_without_pruning() {
    // Commits, aborts, deletes: the chain count only grows.
    let db = Database::new();
    let t1 = db.begin();
    t1.set("a", "1");
    t1.set("b", "2");
    assert!(t1.commit());
    assert_eq!(db.key_count(), 2);

    let t2 = db.begin();
    assert!(t2.delete("a"));
    assert!(t2.commit());
    assert_eq!(db.key_count(), 2);

    let t3 = db.begin();
    t3.set("c", "3");
    t3.abort();
    assert_eq!(db.key_count(), 3);
}
