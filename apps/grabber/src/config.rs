//! Environment-driven configuration.

use anyhow::{anyhow, Context, Result};
use std::env;

use ratewatch_sources::{CurrencyPair, SourceSetting};

/// Runtime configuration for one grabber invocation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot token.
    pub telegram_token: String,
    /// Telegram chat the notifications go to.
    pub telegram_chat_id: String,
    /// Path of the SQLite state database.
    pub db_path: String,
    /// Currency pairs to track, in sync order.
    pub pairs: Vec<CurrencyPair>,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `RATEWATCH_TELEGRAM_TOKEN` and `RATEWATCH_TELEGRAM_CHAT_ID` are
    /// required; `RATEWATCH_DB_PATH` defaults to `ratewatch.db` and
    /// `RATEWATCH_PAIRS` (comma-separated `BASE:DEST` entries) defaults to
    /// `UAH:USD,UAH:EUR`.
    pub fn from_env() -> Result<Self> {
        let telegram_token = require("RATEWATCH_TELEGRAM_TOKEN")?;
        let telegram_chat_id = require("RATEWATCH_TELEGRAM_CHAT_ID")?;
        let db_path =
            env::var("RATEWATCH_DB_PATH").unwrap_or_else(|_| "ratewatch.db".to_string());
        let pairs_raw =
            env::var("RATEWATCH_PAIRS").unwrap_or_else(|_| "UAH:USD,UAH:EUR".to_string());
        let pairs = parse_pairs(&pairs_raw)
            .with_context(|| format!("invalid RATEWATCH_PAIRS value: {pairs_raw:?}"))?;

        Ok(Self {
            telegram_token,
            telegram_chat_id,
            db_path,
            pairs,
        })
    }
}

/// The institutions polled by default, with the display names used in
/// notification messages.
pub fn default_source_settings() -> Vec<SourceSetting> {
    vec![
        SourceSetting::enabled("NBU", "Національний банк України"),
        SourceSetting::enabled("OSCHADBANK", "ОщадБанк"),
        SourceSetting::enabled("PRIVATBANK", "ПриватБанк"),
        SourceSetting::enabled("UKRGASBANK", "УКРГАЗБАНК"),
        SourceSetting::enabled("UKRSIBBANK", "УкрСибБанк"),
    ]
}

fn require(key: &str) -> Result<String> {
    env::var(key).map_err(|_| anyhow!("missing required environment variable {key}"))
}

fn parse_pairs(raw: &str) -> Result<Vec<CurrencyPair>> {
    let pairs: Vec<CurrencyPair> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (base, dest) = entry
                .split_once(':')
                .ok_or_else(|| anyhow!("pair entry {entry:?} is not BASE:DEST"))?;
            CurrencyPair::new(base.trim(), dest.trim())
                .map_err(|e| anyhow!("pair entry {entry:?}: {e}"))
        })
        .collect::<Result<_>>()?;

    if pairs.is_empty() {
        return Err(anyhow!("no currency pairs configured"));
    }
    Ok(pairs)
}
