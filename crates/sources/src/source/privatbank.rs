//! PrivatBank cash-rate source.
//!
//! The only JSON institution: the public p24api endpoint returns an array of
//! rows with stringly-typed buy/sale amounts.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::SourceError;
use crate::models::{is_valid_currency_code, CurrencyPair, RateQuote};
use crate::source::{RateSource, SourcePayload};

/// Source ID constant
const SOURCE_ID: &str = "PRIVATBANK";

const RATES_URL: &str = "https://api.privatbank.ua/p24api/pubinfo";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One row of the p24api payload.
#[derive(Debug, Deserialize)]
struct PrivatRow {
    /// Destination currency code
    ccy: String,
    /// Base currency code
    base_ccy: String,
    /// Buy amount as published (string)
    buy: String,
    /// Sale amount as published (string)
    sale: String,
}

/// Cash exchange-rate source for PrivatBank.
pub struct PrivatBankSource {
    client: Client,
}

impl PrivatBankSource {
    /// Create a new PrivatBank source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn currency_code(value: &str) -> Result<String, SourceError> {
        if !is_valid_currency_code(value) {
            return Err(SourceError::parse(
                SOURCE_ID,
                format!("invalid currency code: {value:?}"),
            ));
        }
        Ok(value.to_string())
    }

    fn rate_value(value: &str) -> Result<f64, SourceError> {
        value
            .parse::<f64>()
            .map_err(|_| SourceError::parse(SOURCE_ID, format!("invalid rate value: {value:?}")))
    }
}

impl Default for PrivatBankSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for PrivatBankSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn poll(&self) -> Result<SourcePayload, SourceError> {
        let response = self
            .client
            .get(RATES_URL)
            .query(&[("json", ""), ("exchange", ""), ("coursid", "5")])
            .send()
            .await
            .map_err(|e| SourceError::from_request(SOURCE_ID, e))?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable {
                source: SOURCE_ID.to_string(),
                message: format!("response code {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_request(SOURCE_ID, e))?;

        Ok(SourcePayload::new(body))
    }

    async fn rates(
        &self,
        payload: Option<&SourcePayload>,
    ) -> Result<Vec<RateQuote>, SourceError> {
        let fetched;
        let payload = match payload {
            Some(payload) => payload,
            None => {
                fetched = self.poll().await?;
                &fetched
            }
        };

        let rows: Vec<PrivatRow> = serde_json::from_str(payload.as_str())
            .map_err(|e| SourceError::parse(SOURCE_ID, format!("invalid payload: {e}")))?;

        let mut quotes = Vec::new();
        for row in rows {
            let base = Self::currency_code(&row.base_ccy)?;
            let dest = Self::currency_code(&row.ccy)?;
            let buy = Self::rate_value(&row.buy)?;
            let sale = Self::rate_value(&row.sale)?;
            let pair = CurrencyPair::new(&base, &dest)?;
            quotes.push(RateQuote::new(SOURCE_ID, pair, buy, sale)?);
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"[
        {"ccy":"USD","base_ccy":"UAH","buy":"27.00000","sale":"27.50000"},
        {"ccy":"EUR","base_ccy":"UAH","buy":"30.10000","sale":"30.80000"}
    ]"#;

    #[tokio::test]
    async fn test_parses_json_rows() {
        let source = PrivatBankSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());

        let quotes = source.rates(Some(&payload)).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair.base(), "UAH");
        assert_eq!(quotes[0].pair.dest(), "USD");
        assert_eq!(quotes[0].buy_rate, 27.0);
        assert_eq!(quotes[0].sale_rate, 27.5);
    }

    #[tokio::test]
    async fn test_finds_tracked_pair() {
        let source = PrivatBankSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());
        let pair = CurrencyPair::new("UAH", "EUR").unwrap();

        let quote = source.rate(&pair, Some(&payload)).await.unwrap().unwrap();

        assert_eq!(quote.buy_rate, 30.1);
        assert_eq!(quote.sale_rate, 30.8);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let source = PrivatBankSource::new();
        let payload = SourcePayload::new("<html>maintenance</html>".to_string());

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_non_numeric_rate_is_parse_error() {
        let source = PrivatBankSource::new();
        let payload = SourcePayload::new(
            r#"[{"ccy":"USD","base_ccy":"UAH","buy":"n/a","sale":"27.5"}]"#.to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
