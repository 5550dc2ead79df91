//! Ratewatch core.
//!
//! The aggregation/diffing/notification engine: the exchange-rate entity and
//! its change rule, the observer fan-out, the state-store contract with a
//! SQLite backend, the Telegram notification path, and the worker-per-source
//! sync service. Fetching and parsing live in the `ratewatch-sources` crate;
//! process bootstrap lives in the `ratewatch-grabber` binary.

pub mod constants;
pub mod errors;
pub mod notify;
pub mod rates;
pub mod storage;

// Re-export commonly used types for convenience
pub use constants::RATE_TOLERANCE;
pub use errors::{Error, Result, StoreError};
pub use notify::{ChangeNotifier, NotificationSink, NotifyError, TelegramSink};
pub use rates::{
    state_key, ExchangeRate, RateError, RateObserver, RateSnapshot, RateSyncService, StateStore,
    SourceSyncResult, SyncStatus, SyncSummary,
};
pub use storage::SqliteStateStore;
