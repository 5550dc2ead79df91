//! Exchange-rate entity error types.

use thiserror::Error;

use ratewatch_sources::SourceError;

/// Errors that can occur while constructing or mutating an exchange rate.
#[derive(Error, Debug)]
pub enum RateError {
    /// The source publishes nothing for the requested pair.
    #[error("Exchange rate for {base} -> {dest} was not found")]
    RateNotFound {
        /// Base currency code
        base: String,
        /// Destination currency code
        dest: String,
    },

    /// A currency code failed the `[A-Z]{3}` rule.
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    /// A rate was zero or negative.
    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    /// A persisted snapshot could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The underlying source failed while the entity was asking it for data.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}
