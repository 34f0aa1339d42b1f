//! The database: transaction registry and multi-version store
//!
//! `Database` owns everything: the table of every transaction ever begun
//! and the per-key version chains. Connections hold a shared handle into
//! this state plus the id of their transaction; the transaction record
//! outlives the connection because visibility decisions consult the states
//! of arbitrarily old transactions.
//!
//! Version records reference transactions by id only, and transactions
//! reference keys by set membership, so the data graph has no cycles.

use crate::config::EngineConfig;
use crate::connection::Connection;
use lamina_concurrency::{Transaction, TransactionTable, VersionChain};
use lamina_core::{IsolationLevel, Key, Result, TransactionState, TxnId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Interior state shared between the database and its connections
#[derive(Debug)]
pub(crate) struct DatabaseInner {
    /// Next transaction id to hand out. Strictly increasing, never reused.
    pub(crate) next_id: TxnId,
    /// Every transaction ever begun, keyed by id. Never pruned.
    pub(crate) txns: TransactionTable,
    /// Version chains, keyed by the key they version. Ordered so that any
    /// scan over the store is deterministic.
    pub(crate) store: BTreeMap<Key, VersionChain>,
    /// Isolation level applied by `begin` when none is given.
    pub(crate) default_isolation: IsolationLevel,
}

/// An in-memory MVCC key-value database
///
/// All state lives in memory and is dropped with the last handle; there is
/// no persistence. Execution is single-threaded cooperative: the lock on
/// the interior exists for the shared-handle ownership shape (database and
/// live connections all reach the same state), not for parallelism, and no
/// operation blocks or suspends.
///
/// # Example
///
/// ```
/// use lamina_engine::{Database, IsolationLevel, Value};
///
/// let db = Database::new();
/// let conn = db.begin_with_isolation(IsolationLevel::Snapshot);
/// conn.set("greeting", "hello");
/// assert_eq!(conn.get("greeting"), Some(Value::new("hello")));
/// assert!(conn.commit());
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<RwLock<DatabaseInner>>,
}

impl Database {
    /// Create an empty database with the default isolation level
    pub fn new() -> Self {
        Self::with_isolation(IsolationLevel::default())
    }

    /// Create an empty database with the given default isolation level
    pub fn with_isolation(default_isolation: IsolationLevel) -> Self {
        Database {
            inner: Arc::new(RwLock::new(DatabaseInner {
                next_id: TxnId::FIRST,
                txns: TransactionTable::new(),
                store: BTreeMap::new(),
                default_isolation,
            })),
        }
    }

    /// Create an empty database configured from an [`EngineConfig`]
    ///
    /// # Errors
    ///
    /// Returns an error if the configured isolation level is not one of the
    /// supported names.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::with_isolation(config.isolation_level()?))
    }

    /// The isolation level applied when `begin` is called without one
    pub fn default_isolation(&self) -> IsolationLevel {
        self.inner.read().default_isolation
    }

    /// Set the isolation level for subsequently begun transactions
    ///
    /// Transactions already in progress keep the level they began with.
    pub fn set_isolation(&self, level: IsolationLevel) {
        self.inner.write().default_isolation = level;
    }

    /// Begin a transaction at the database's default isolation level
    pub fn begin(&self) -> Connection {
        let level = self.default_isolation();
        self.begin_with_isolation(level)
    }

    /// Begin a transaction at the given isolation level
    ///
    /// Allocates the next id and captures the set of transactions that are
    /// in progress at this instant; that set is frozen for the lifetime of
    /// the transaction and anchors its snapshot.
    pub fn begin_with_isolation(&self, isolation: IsolationLevel) -> Connection {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id = id.next();

        let concurrent_at_start: BTreeSet<TxnId> = inner
            .txns
            .iter()
            .filter(|(_, t)| t.is_in_progress())
            .map(|(&tid, _)| tid)
            .collect();

        debug!(txn = %id, %isolation, concurrent = concurrent_at_start.len(), "begin");
        inner
            .txns
            .insert(id, Transaction::new(id, isolation, concurrent_at_start));
        drop(inner);

        Connection::new(Arc::clone(&self.inner), id)
    }

    /// Look up the state of a transaction by id
    ///
    /// Returns `None` for ids the database never assigned. Useful for
    /// observing a transaction after its connection is gone.
    pub fn transaction_state(&self, id: TxnId) -> Option<TransactionState> {
        self.inner.read().txns.get(&id).map(|t| t.state())
    }

    /// Number of transactions the database has begun so far
    pub fn transaction_count(&self) -> usize {
        self.inner.read().txns.len()
    }

    /// Number of keys that have a version chain
    ///
    /// Counts chains, not visible keys: a chain whose versions are all
    /// terminated or aborted still counts, since chains are never removed.
    pub fn key_count(&self) -> usize {
        self.inner.read().store.len()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
