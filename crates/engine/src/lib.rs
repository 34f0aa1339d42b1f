//! Database and Connection facade for the lamina MVCC engine
//!
//! This crate ties the concurrency layer to an embeddable surface:
//! - `Database`: owns the transaction table and the multi-version store,
//!   allocates transaction ids, and hands out connections
//! - `Connection`: a scoped handle to one transaction, exposing
//!   `get`/`set`/`delete`/`commit`/`abort`; dropping a live connection
//!   aborts its transaction
//! - `EngineConfig`: TOML-backed configuration (default isolation level)
//! - `RetryConfig` + `Database::run_transaction`: closure-based retry
//!   convenience for embedders that want automatic re-execution on conflict
//!
//! The engine performs no I/O and assumes a single-threaded cooperative
//! embedder: interleaving comes from holding several live connections and
//! alternating their calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod database;
pub mod retry;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use connection::{Connection, PendingOperations};
pub use database::Database;
pub use retry::RetryConfig;

// Re-export the core vocabulary so embedders need only this crate.
pub use lamina_core::{Error, IsolationLevel, Key, Result, TransactionState, TxnId, Value};
