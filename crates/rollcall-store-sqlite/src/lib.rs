//! SQLite backend for the Rollcall attendance engine.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on one dedicated
//! connection thread without blocking the async runtime. Because every
//! operation executes as a single closure on that thread, check-then-write
//! sequences inside one closure are serialized against each other — this is
//! the single-writer boundary the engine's atomicity contract asks for.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;
