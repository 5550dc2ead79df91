//! Ratewatch Sources Crate
//!
//! This crate provides source-agnostic exchange-rate fetching for the
//! ratewatch application.
//!
//! # Overview
//!
//! The sources crate supports:
//! - Multiple rate publishers: NBU, PrivatBank, OschadBank, UkrGasBank, UkrSibBank
//! - A single capability trait (`RateSource`) the core depends on
//! - Settings-driven source registration with display names
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  SourceRegistry  | --> |    RateSource    |  (capability trait)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  SourcePayload   |  (opaque raw document)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    RateQuote     |  (parsed record)
//!                          +------------------+
//! ```
//!
//! Each concrete source owns its fetching and markup/JSON extraction; callers
//! only ever see `RateQuote` records or a `SourceError`.

pub mod errors;
pub mod models;
pub mod registry;
pub mod source;

// Re-exports
pub use errors::SourceError;
pub use models::{is_valid_currency_code, CurrencyPair, RateQuote};
pub use registry::{SourceRegistry, SourceSetting};
pub use source::{RateSource, SourcePayload};
pub use source::nbu::NbuSource;
pub use source::oschadbank::OschadBankSource;
pub use source::privatbank::PrivatBankSource;
pub use source::ukrgasbank::UkrGasBankSource;
pub use source::ukrsibbank::UkrSibBankSource;
