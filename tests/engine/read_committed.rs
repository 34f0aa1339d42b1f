//! Read committed
//!
//! No snapshot retention: every read observes the latest committed state
//! at the instant of the read, including commits from transactions that
//! began after the reader. Uncommitted writes stay invisible.

use crate::common::{preload, preloaded_db, val};
use lamina::{Database, IsolationLevel};

#[test]
fn reads_advance_as_peers_commit() {
    let db = preloaded_db(IsolationLevel::ReadCommitted);
    let t1 = db.begin();
    let t2 = db.begin();

    t1.set("k", "t1");
    assert_eq!(t2.get("k"), val("val"));
    assert!(t1.commit());

    // A writer that began after t2 commits; t2 observes it anyway.
    let t3 = db.begin();
    t3.set("k", "t3");
    assert!(t3.commit());

    assert_eq!(t2.get("k"), val("t3"));
    assert!(t2.commit());
}

#[test]
fn uncommitted_writes_are_invisible() {
    let db = preloaded_db(IsolationLevel::ReadCommitted);
    let writer = db.begin();
    let reader = db.begin();

    writer.set("k", "pending");
    assert_eq!(reader.get("k"), val("val"));
}

#[test]
fn committed_delete_is_observed_mid_transaction() {
    let db = preloaded_db(IsolationLevel::ReadCommitted);
    let reader = db.begin();
    assert_eq!(reader.get("k"), val("val"));

    let deleter = db.begin();
    assert!(deleter.delete("k"));
    assert!(deleter.commit());

    assert_eq!(reader.get("k"), None);
}

#[test]
fn aborted_peer_write_never_becomes_visible() {
    let db = preloaded_db(IsolationLevel::ReadCommitted);
    let reader = db.begin();

    let writer = db.begin();
    writer.set("k", "doomed");
    writer.abort();

    assert_eq!(reader.get("k"), val("val"));
}

#[test]
fn read_committed_commit_never_validates() {
    let db = Database::with_isolation(IsolationLevel::ReadCommitted);
    preload(&db, "k", "val");
    let t1 = db.begin();
    let t2 = db.begin();

    t1.set("k", "one");
    t2.set("k", "two");
    assert!(t1.commit());
    assert!(t2.commit());
}
