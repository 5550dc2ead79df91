//! Core error types for the ratewatch application.
//!
//! This module defines storage-agnostic error types. Backend-specific
//! failures (rusqlite, network stores) are converted to these types by the
//! storage layer.

use thiserror::Error;

use crate::notify::NotifyError;
use crate::rates::RateError;
use ratewatch_sources::SourceError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ratewatch core.
///
/// This enum represents all possible errors that can occur while syncing
/// rates. Storage-specific errors are wrapped in string form to keep this
/// type backend-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("State store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Rate source operation failed: {0}")]
    Source(#[from] SourceError),

    #[error("Exchange rate operation failed: {0}")]
    Rate(#[from] RateError),

    #[error("Notification delivery failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for state-store operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert backend-specific errors (rusqlite, etc.) into this format.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}
