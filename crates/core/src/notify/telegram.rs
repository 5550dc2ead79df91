//! Telegram Bot API delivery sink.

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::errors::NotifyError;
use super::message::change_message;
use super::NotificationSink;
use crate::rates::RateSnapshot;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers notifications via the Telegram `sendMessage` endpoint.
pub struct TelegramSink {
    client: Client,
    token: String,
    chat_id: String,
    display_names: HashMap<String, String>,
}

impl TelegramSink {
    /// Create a sink for a bot token and target chat.
    ///
    /// `display_names` maps source ids to the human-readable names used in
    /// message text; an unmapped id falls back to the id itself.
    pub fn new(token: String, chat_id: String, display_names: HashMap<String, String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            chat_id,
            display_names,
        }
    }

    fn display_name<'a>(&'a self, source_id: &'a str) -> &'a str {
        self.display_names
            .get(source_id)
            .map_or(source_id, String::as_str)
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn deliver(
        &self,
        previous: Option<&RateSnapshot>,
        latest: &RateSnapshot,
    ) -> Result<(), NotifyError> {
        let text = change_message(self.display_name(&latest.source_id), previous, latest);

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let response = self
            .client
            .post(&url)
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text.as_str()),
                ("parse_mode", "HTML"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else {
                    NotifyError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::DeliveryFailed {
                status: status.as_u16(),
            });
        }

        info!(
            "Telegram delivered the notification for {} ({status}).",
            latest.state_key()
        );
        Ok(())
    }
}
