//! Exchange-rate domain module.
//!
//! This module provides the core types for diffing and notifying on rates:
//!
//! - [`model`] - the `ExchangeRate` entity, its snapshot form, and the
//!   change-detection rule
//! - [`observer`] - the lifecycle callback trait
//! - [`store`] - the durable key-value contract for last-known snapshots
//! - [`sync`] - the worker-per-source sync service
//!
//! # Architecture
//!
//! ```text
//! RateSyncService → RateSource (ratewatch-sources crate)
//!       ↓
//! ExchangeRate ←→ StateStore (snapshots)
//!       ↓
//! RateObserver (notification fan-out)
//! ```
//!
//! The entity owns its observers for the life of the process; only the
//! snapshot crosses the persistence boundary.

pub mod errors;
pub mod model;
pub mod observer;
pub mod store;
pub mod sync;


// Re-export commonly used types for convenience
pub use errors::RateError;
pub use model::{ExchangeRate, RateSnapshot};
pub use observer::RateObserver;
pub use store::{state_key, StateStore};
pub use sync::{RateSyncService, SourceSyncResult, SyncStatus, SyncSummary};
