//! Raw rate records and currency-pair types shared by all sources.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SourceError;

lazy_static! {
    static ref CURRENCY_CODE_RE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
}

/// Returns true when `code` is a three-letter uppercase alphabetic currency code.
pub fn is_valid_currency_code(code: &str) -> bool {
    CURRENCY_CODE_RE.is_match(code)
}

/// A tracked currency pair: base (quoting) currency and destination currency.
///
/// The codes are validated on construction; a pair that exists is always
/// well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    base: String,
    dest: String,
}

impl CurrencyPair {
    /// Build a pair from two `[A-Z]{3}` codes.
    pub fn new(base: &str, dest: &str) -> Result<Self, SourceError> {
        for code in [base, dest] {
            if !is_valid_currency_code(code) {
                return Err(SourceError::Parse {
                    source: "pair".to_string(),
                    message: format!("invalid currency code: {code}"),
                });
            }
        }
        Ok(Self {
            base: base.to_string(),
            dest: dest.to_string(),
        })
    }

    /// Base (quoting) currency code, e.g. "UAH".
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Destination currency code, e.g. "USD".
    pub fn dest(&self) -> &str {
        &self.dest
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.base, self.dest)
    }
}

/// One parsed buy/sell observation from a source.
///
/// This is the raw record a source hands to the core; the core turns it into
/// its own entity. `observed_at` is the capture time because none of the
/// institutions publish a quote timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct RateQuote {
    /// Identifier of the source that produced the record.
    pub source_id: &'static str,
    /// The currency pair the rates apply to.
    pub pair: CurrencyPair,
    /// Buy rate, strictly positive.
    pub buy_rate: f64,
    /// Sale rate, strictly positive.
    pub sale_rate: f64,
    /// When the record was captured.
    pub observed_at: DateTime<Utc>,
}

impl RateQuote {
    /// Build a record stamped with the current capture time.
    pub fn new(
        source_id: &'static str,
        pair: CurrencyPair,
        buy_rate: f64,
        sale_rate: f64,
    ) -> Result<Self, SourceError> {
        if buy_rate <= 0.0 || sale_rate <= 0.0 {
            return Err(SourceError::parse(
                source_id,
                format!("non-positive rate for {pair}: buy={buy_rate}, sale={sale_rate}"),
            ));
        }
        Ok(Self {
            source_id,
            pair,
            buy_rate,
            sale_rate,
            observed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_currency_codes() {
        assert!(is_valid_currency_code("UAH"));
        assert!(is_valid_currency_code("USD"));
        assert!(!is_valid_currency_code("usd"));
        assert!(!is_valid_currency_code("US"));
        assert!(!is_valid_currency_code("USDT"));
        assert!(!is_valid_currency_code("U1D"));
    }

    #[test]
    fn test_pair_rejects_bad_codes() {
        assert!(CurrencyPair::new("UAH", "usd").is_err());
        assert!(CurrencyPair::new("", "USD").is_err());
        let pair = CurrencyPair::new("UAH", "EUR").unwrap();
        assert_eq!(pair.base(), "UAH");
        assert_eq!(pair.dest(), "EUR");
    }

    #[test]
    fn test_quote_rejects_non_positive_rates() {
        let pair = CurrencyPair::new("UAH", "USD").unwrap();
        assert!(RateQuote::new("NBU", pair.clone(), 0.0, 27.5).is_err());
        assert!(RateQuote::new("NBU", pair.clone(), 27.0, -1.0).is_err());
        let quote = RateQuote::new("NBU", pair, 27.0, 27.5).unwrap();
        assert_eq!(quote.buy_rate, 27.0);
        assert_eq!(quote.sale_rate, 27.5);
    }
}
