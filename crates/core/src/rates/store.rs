//! State-store contract.
//!
//! The state store is the system's only durable memory between polling
//! cycles: a shared key-value store holding the serialized last-known
//! snapshot per tracked series. This trait abstracts the backend; the
//! bundled SQLite implementation lives in [`crate::storage`].
//!
//! # Design Notes
//!
//! - Values are opaque bytes; the store never interprets them
//! - Entries have no expiry and are only ever overwritten, never evicted
//! - The store offers no transactions: the caller serializes its own
//!   check-then-write sequences (the sync service holds one coarse lock
//!   across them)

use async_trait::async_trait;

use crate::errors::StoreError;

/// Derive the store key for one tracked series.
///
/// The triple identifies the series: the same pair from two sources is two
/// independent series.
pub fn state_key(source_id: &str, base: &str, dest: &str) -> String {
    format!("{source_id}:{base}:{dest}")
}

/// Storage interface for last-known rate snapshots.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// True when a snapshot is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// The stored bytes for `key`, or `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_is_colon_joined() {
        assert_eq!(state_key("NBU", "UAH", "USD"), "NBU:UAH:USD");
    }
}
