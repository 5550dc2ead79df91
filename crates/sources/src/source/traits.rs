//! Rate source trait definition.
//!
//! This module defines the core `RateSource` trait that all rate
//! sources must implement.

use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{CurrencyPair, RateQuote};

/// A raw document fetched from a source.
///
/// The content is opaque to everything outside the source that produced it:
/// one institution publishes JSON, another an HTML page. Callers only ever
/// pass a payload back to the same source for extraction.
#[derive(Clone, Debug)]
pub struct SourcePayload(String);

impl SourcePayload {
    /// Wrap a raw response body.
    pub fn new(body: String) -> Self {
        Self(body)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trait for exchange-rate sources.
///
/// Implement this trait to add support for a new institution. The registry
/// constructs sources from settings and the sync service drives them; neither
/// knows anything about a source's document format.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Unique identifier for this source.
    ///
    /// Should be a constant string like "NBU", "PRIVATBANK", etc.
    /// Used for logging, state-store keys, and display-name lookup.
    fn id(&self) -> &'static str;

    /// Fetch the source's current document.
    ///
    /// # Returns
    ///
    /// The raw payload on success. Transport failures and non-success HTTP
    /// statuses surface as [`SourceError::Unavailable`]; passing the fixed
    /// request deadline surfaces as [`SourceError::Timeout`].
    async fn poll(&self) -> Result<SourcePayload, SourceError>;

    /// Extract every quote the source currently publishes.
    ///
    /// # Arguments
    ///
    /// * `payload` - A previously fetched document; when `None` the source
    ///   polls internally.
    ///
    /// # Returns
    ///
    /// The parsed records in document order. A malformed or missing field is
    /// a [`SourceError::Parse`], never a silently dropped row.
    async fn rates(&self, payload: Option<&SourcePayload>)
        -> Result<Vec<RateQuote>, SourceError>;

    /// Extract the quote for one pair, or `None` when the source does not
    /// publish that pair.
    ///
    /// Default implementation scans [`rates`](Self::rates).
    async fn rate(
        &self,
        pair: &CurrencyPair,
        payload: Option<&SourcePayload>,
    ) -> Result<Option<RateQuote>, SourceError> {
        let rates = self.rates(payload).await?;
        Ok(rates.into_iter().find(|quote| &quote.pair == pair))
    }
}
