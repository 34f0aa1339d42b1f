//! Engine Integration Tests
//!
//! Exercises the full engine surface: transaction lifecycle, the four
//! isolation levels, and the invariants the engine promises regardless of
//! level. Concurrency is simulated the way the engine defines it: several
//! live connections from one thread, calls interleaved.

mod common;

mod invariants;
mod lifecycle;
mod read_committed;
