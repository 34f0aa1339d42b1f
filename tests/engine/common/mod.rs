//! Shared helpers for engine integration tests

use lamina::{Database, IsolationLevel, Value};

/// Commit `key = value` through its own transaction
pub fn preload(db: &Database, key: &str, value: &str) {
    let conn = db.begin();
    conn.set(key, value);
    assert!(conn.commit(), "preload commit must succeed");
}

/// A database at the given default isolation level with `"k" = "val"`
/// already committed
pub fn preloaded_db(isolation: IsolationLevel) -> Database {
    let db = Database::with_isolation(isolation);
    preload(&db, "k", "val");
    db
}

/// Shorthand for the expected value of a successful `get`
pub fn val(s: &str) -> Option<Value> {
    Some(Value::new(s))
}
