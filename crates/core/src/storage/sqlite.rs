//! SQLite-backed state store.
//!
//! A single two-column table holds the serialized last-known snapshot per
//! series key. The file lives wherever configuration points it, so state
//! survives the scheduled process restarts that the diffing depends on.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::errors::StoreError;
use crate::rates::StateStore;

/// State store over a local SQLite database.
///
/// The connection sits behind a mutex; operations are single-row reads and
/// writes, and the sync service additionally serializes whole
/// check-then-write sequences with its own lock.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
}

impl SqliteStateStore {
    /// Open (or create) the database at `path` and ensure the state table
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::init(conn)
    }

    /// Open an in-memory store. State does not survive the process; used in
    /// tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS rate_state (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let found = conn
            .query_row(
                "SELECT 1 FROM rate_state WHERE key = ?1",
                params![key],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(found.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM rate_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rate_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(())
    }
}
