//! Run-once rate grabber.
//!
//! Intended to be invoked on a schedule by an external scheduler (cron,
//! systemd timer). One invocation polls every configured source once, diffs
//! against the state database, pushes notifications, and exits.

mod config;

use std::collections::HashMap;
use std::sync::Arc;

use config::{default_source_settings, Config};
use ratewatch_core::{
    ChangeNotifier, RateObserver, RateSyncService, SqliteStateStore, StateStore, TelegramSink,
};
use ratewatch_sources::SourceRegistry;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("Fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let settings = default_source_settings();
    let registry = SourceRegistry::new(&settings);

    let display_names: HashMap<String, String> = settings
        .iter()
        .map(|setting| (setting.id.clone(), setting.name.clone()))
        .collect();

    let store: Arc<dyn StateStore> = Arc::new(SqliteStateStore::open(&config.db_path)?);
    let sink = Arc::new(TelegramSink::new(
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
        display_names,
    ));
    let notifier: Arc<dyn RateObserver> = Arc::new(ChangeNotifier::new(sink));

    let service = RateSyncService::new(
        registry.sources().to_vec(),
        config.pairs.clone(),
        store,
        notifier,
    );

    tracing::info!(
        "Starting sync cycle: {} sources, {} pairs",
        registry.len(),
        config.pairs.len()
    );

    let summary = service.run_once().await;

    for result in &summary.results {
        if let Some(error) = &result.error {
            tracing::warn!("{}: worker failed: {error}", result.source_id);
        }
    }
    tracing::info!(
        "Sync cycle finished: {} pairs synced, {} sources failed",
        summary.pairs_synced(),
        summary.failed_sources()
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
