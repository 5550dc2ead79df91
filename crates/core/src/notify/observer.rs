//! The observer that bridges rate events to a notification sink.

use async_trait::async_trait;
use log::error;
use std::sync::Arc;

use super::NotificationSink;
use crate::rates::{RateObserver, RateSnapshot};

/// Forwards created and changed events to a [`NotificationSink`].
///
/// Plain refreshes (`rate_updated`) stay silent: they are ordinary polling
/// noise. Delivery failures are logged and swallowed; the persisted state is
/// already written and notification is best-effort.
pub struct ChangeNotifier {
    sink: Arc<dyn NotificationSink>,
}

impl ChangeNotifier {
    /// Build a notifier over a delivery sink.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl RateObserver for ChangeNotifier {
    async fn rate_created(&self, rate: &RateSnapshot) {
        if let Err(e) = self.sink.deliver(None, rate).await {
            error!(
                "Notification delivery failed for new series {}: {e}",
                rate.state_key()
            );
        }
    }

    async fn rate_updated(&self, _pre: &RateSnapshot, _post: &RateSnapshot) {}

    async fn rate_changed(&self, pre: &RateSnapshot, post: &RateSnapshot) {
        if let Err(e) = self.sink.deliver(Some(pre), post).await {
            error!(
                "Notification delivery failed for changed series {}: {e}",
                post.state_key()
            );
        }
    }
}
