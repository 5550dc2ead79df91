//! Exchange-rate observer trait definition.

use async_trait::async_trait;

use super::model::RateSnapshot;

/// Callback surface for exchange-rate lifecycle events.
///
/// Implementations must not fail: delivery problems are an observer-internal
/// concern (log and move on), because by the time an observer runs the new
/// state is already the system's truth and is not rolled back.
///
/// The distinction between the two refresh callbacks:
/// - `rate_updated` fires on every refresh, including one that re-confirms
///   the current values (a liveness hook);
/// - `rate_changed` fires only when a rate moved beyond the change-detection
///   tolerance.
#[async_trait]
pub trait RateObserver: Send + Sync {
    /// The key was observed for the first time.
    async fn rate_created(&self, rate: &RateSnapshot);

    /// The rate was refreshed; fires on every update.
    async fn rate_updated(&self, pre: &RateSnapshot, post: &RateSnapshot);

    /// The rate materially moved; fires only when a rate changed beyond
    /// tolerance.
    async fn rate_changed(&self, pre: &RateSnapshot, post: &RateSnapshot);
}
