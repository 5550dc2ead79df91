//! Settings-driven source registry.
//!
//! The registry replaces any ambient source list with an explicit
//! configuration structure: each entry names a source implementation, its
//! human-readable display name, and whether it is enabled. Disabled and
//! unknown entries are skipped with a log line, never an error.

use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::source::nbu::NbuSource;
use crate::source::oschadbank::OschadBankSource;
use crate::source::privatbank::PrivatBankSource;
use crate::source::ukrgasbank::UkrGasBankSource;
use crate::source::ukrsibbank::UkrSibBankSource;
use crate::source::RateSource;

/// Configuration for one source registration.
#[derive(Clone, Debug)]
pub struct SourceSetting {
    /// Source identifier, e.g. "NBU"
    pub id: String,
    /// Human-readable display name used in notifications
    pub name: String,
    /// Whether the source participates in sync runs
    pub enabled: bool,
}

impl SourceSetting {
    /// Convenience constructor for an enabled source.
    pub fn enabled(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
        }
    }
}

/// Registry of active rate sources with their display names.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn RateSource>>,
    display_names: HashMap<String, String>,
}

impl SourceRegistry {
    /// Build a registry from source settings.
    ///
    /// Entries are activated in settings order. A disabled entry is skipped
    /// with an info log; an entry whose id matches no known implementation is
    /// skipped with a warning.
    pub fn new(settings: &[SourceSetting]) -> Self {
        let mut sources: Vec<Arc<dyn RateSource>> = Vec::new();
        let mut display_names = HashMap::new();

        for setting in settings {
            if !setting.enabled {
                info!(
                    "Source '{}' (ID: {}) is disabled, skipping.",
                    setting.name, setting.id
                );
                continue;
            }

            let source: Option<Arc<dyn RateSource>> = match setting.id.as_str() {
                "NBU" => Some(Arc::new(NbuSource::new())),
                "PRIVATBANK" => Some(Arc::new(PrivatBankSource::new())),
                "OSCHADBANK" => Some(Arc::new(OschadBankSource::new())),
                "UKRGASBANK" => Some(Arc::new(UkrGasBankSource::new())),
                "UKRSIBBANK" => Some(Arc::new(UkrSibBankSource::new())),
                _ => {
                    warn!("Unknown rate source ID: {}. Skipping.", setting.id);
                    None
                }
            };

            if let Some(source) = source {
                info!(
                    "Activated source: {} (ID: {})",
                    setting.name,
                    source.id()
                );
                display_names.insert(setting.id.clone(), setting.name.clone());
                sources.push(source);
            }
        }

        if sources.is_empty() {
            warn!("No rate sources were configured and enabled. Nothing will be polled.");
        }

        Self {
            sources,
            display_names,
        }
    }

    /// Active sources in settings order.
    pub fn sources(&self) -> &[Arc<dyn RateSource>] {
        &self.sources
    }

    /// Display name for a source id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.display_names.get(id).map_or(id, String::as_str)
    }

    /// Number of active sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source is active.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_active_sources_in_order() {
        let registry = SourceRegistry::new(&[
            SourceSetting::enabled("NBU", "Національний банк України"),
            SourceSetting::enabled("PRIVATBANK", "ПриватБанк"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sources()[0].id(), "NBU");
        assert_eq!(registry.sources()[1].id(), "PRIVATBANK");
    }

    #[test]
    fn test_skips_disabled_and_unknown_entries() {
        let registry = SourceRegistry::new(&[
            SourceSetting {
                id: "NBU".to_string(),
                name: "НБУ".to_string(),
                enabled: false,
            },
            SourceSetting::enabled("MONOBANK", "Монобанк"),
            SourceSetting::enabled("OSCHADBANK", "ОщадБанк"),
        ]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sources()[0].id(), "OSCHADBANK");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let registry = SourceRegistry::new(&[SourceSetting::enabled("NBU", "НБУ")]);

        assert_eq!(registry.display_name("NBU"), "НБУ");
        assert_eq!(registry.display_name("UNKNOWN"), "UNKNOWN");
    }
}
