//! Core types for the lamina MVCC engine
//!
//! This crate defines the foundational vocabulary shared by every layer:
//! - `TxnId`: monotonically increasing transaction identity
//! - `IsolationLevel`: the four supported isolation levels
//! - `TransactionState`: the transaction lifecycle states
//! - `Key` / `Value`: the opaque key-value payload types
//! - `Error` / `Result`: the unified error surface
//!
//! Nothing in this crate performs I/O or holds engine state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use types::{IsolationLevel, Key, TransactionState, TxnId};
pub use value::Value;
