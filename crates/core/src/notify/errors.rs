//! Notification error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The messaging endpoint answered with a non-success status.
    #[error("Delivery failed: response code {status}")]
    DeliveryFailed {
        /// HTTP status returned by the endpoint
        status: u16,
    },

    /// The delivery request exceeded the fixed deadline.
    #[error("Delivery timed out")]
    Timeout,

    /// Transport-level failure talking to the endpoint.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
