//! Change notification.
//!
//! This module turns rate lifecycle events into outbound messages:
//!
//! - [`NotificationSink`] - delivery contract: given an optional previous
//!   snapshot and the current one, format and push a message
//! - [`ChangeNotifier`] - the observer wired into every synced rate; created
//!   and changed events reach the sink, plain refreshes do not
//! - [`TelegramSink`] - delivery over the Telegram Bot API
//! - [`message`] - the human-readable message format
//!
//! Delivery is best-effort: by the time a notification fires, the new state
//! is already persisted and a failed push never rolls it back.

pub mod errors;
pub mod message;
pub mod observer;
pub mod telegram;

use async_trait::async_trait;

use crate::rates::RateSnapshot;

pub use errors::NotifyError;
pub use observer::ChangeNotifier;
pub use telegram::TelegramSink;

/// Delivery contract for change notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Format and deliver a notification.
    ///
    /// `previous` is `None` for the first observation of a series.
    async fn deliver(
        &self,
        previous: Option<&RateSnapshot>,
        latest: &RateSnapshot,
    ) -> Result<(), NotifyError>;
}
