//! # lamina
//!
//! An embedded, in-memory MVCC key-value engine with four isolation levels
//! and commit-time conflict detection.
//!
//! lamina keeps every version ever written: a write appends to the key's
//! version chain, a delete terminates the visible version, and a pure
//! visibility predicate decides what each transaction observes. Concurrency
//! is cooperative and single-threaded: open several connections from one
//! thread and interleave their calls.
//!
//! # Quick Start
//!
//! ```
//! use lamina::{Database, IsolationLevel, Value};
//!
//! let db = Database::new();
//!
//! // Writes are invisible to others until commit.
//! let writer = db.begin();
//! writer.set("user:name", "Alice");
//! let reader = db.begin();
//! assert_eq!(reader.get("user:name"), None);
//! assert!(writer.commit());
//!
//! // A fresh transaction sees the committed value.
//! let fresh = db.begin();
//! assert_eq!(fresh.get("user:name"), Some(Value::new("Alice")));
//!
//! // Two snapshot transactions racing on one key: first committer wins.
//! db.set_isolation(IsolationLevel::Snapshot);
//! let t1 = db.begin();
//! let t2 = db.begin();
//! t1.set("user:name", "Bob");
//! t2.set("user:name", "Carol");
//! assert!(t1.commit());
//! assert!(!t2.commit()); // aborted: write-write conflict
//! ```
//!
//! # Operations
//!
//! | Operation | Returns | On failure |
//! |-----------|---------|------------|
//! | [`Database::begin`] | `Connection` | — |
//! | [`Database::set_isolation`] | — | — |
//! | [`Connection::get`] | `Option<Value>` | `None` when nothing is visible |
//! | [`Connection::set`] | — | — |
//! | [`Connection::delete`] | `bool` | `false` when the key is absent |
//! | [`Connection::commit`] | `bool` | `false` when validation refuses |
//! | [`Connection::abort`] | — | — |
//!
//! Dropping a connection whose transaction is still in progress aborts the
//! transaction.
//!
//! # Architecture
//!
//! The [`Database`] struct is the entry point. The version-storage model,
//! visibility rules, and commit validation live in internal crates
//! (`lamina-core`, `lamina-concurrency`, `lamina-engine`); only the surface
//! re-exported here is stable.

// Re-export the public API from lamina-engine
pub use lamina_engine::*;
