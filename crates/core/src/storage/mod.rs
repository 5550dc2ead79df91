//! State-store backends.

pub mod sqlite;

pub use sqlite::SqliteStateStore;
