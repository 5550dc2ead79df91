//! National Bank of Ukraine official-rate source.
//!
//! Scrapes the daily official rates table published at bank.gov.ua. The NBU
//! publishes a single official rate per currency, so the buy and sale rates
//! of a record are the same value. Rates on the page use a decimal comma.

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::Duration;

use crate::errors::SourceError;
use crate::models::{is_valid_currency_code, CurrencyPair, RateQuote};
use crate::source::html::{cell_text, select_all};
use crate::source::{RateSource, SourcePayload};

/// Source ID constant
const SOURCE_ID: &str = "NBU";

const RATES_URL: &str = "https://bank.gov.ua/ua/markets/exchangerates";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Official exchange-rate source for the National Bank of Ukraine.
pub struct NbuSource {
    client: Client,
}

impl NbuSource {
    /// Create a new NBU source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn destination_code(row: &ElementRef<'_>) -> Result<String, SourceError> {
        let code = cell_text(SOURCE_ID, row, 1)?;
        if !is_valid_currency_code(&code) {
            return Err(SourceError::parse(
                SOURCE_ID,
                format!("invalid currency code: {code:?}"),
            ));
        }
        Ok(code)
    }

    fn official_rate(row: &ElementRef<'_>) -> Result<f64, SourceError> {
        let text = cell_text(SOURCE_ID, row, 4)?;
        text.replace(',', ".")
            .parse::<f64>()
            .map_err(|_| SourceError::parse(SOURCE_ID, format!("invalid rate value: {text:?}")))
    }
}

impl Default for NbuSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for NbuSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn poll(&self) -> Result<SourcePayload, SourceError> {
        let date = Local::now().format("%d.%m.%Y").to_string();
        let response = self
            .client
            .get(RATES_URL)
            .query(&[("period", "daily"), ("date", date.as_str())])
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

        let document = Html::parse_document(payload.as_str());
        let rows = select_all(&document, "table#exchangeRates > tbody > tr")?;

        let mut quotes = Vec::new();
        for row in rows {
            let dest = Self::destination_code(&row)?;
            let rate = Self::official_rate(&row)?;
            let pair = CurrencyPair::new("UAH", &dest)?;
            // The NBU publishes one official rate, used for both sides.
            quotes.push(RateQuote::new(SOURCE_ID, pair, rate, rate)?);
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <table id="exchangeRates">
          <tbody>
            <tr>
              <td>840</td><td>USD</td><td>1</td><td>Долар США</td><td>27,1234</td>
            </tr>
            <tr>
              <td>978</td><td>EUR</td><td>1</td><td>Євро</td><td>30,5000</td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[tokio::test]
    async fn test_parses_official_rates() {
        let source = NbuSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());

        let quotes = source.rates(Some(&payload)).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair.dest(), "USD");
        assert_eq!(quotes[0].buy_rate, 27.1234);
        assert_eq!(quotes[0].sale_rate, 27.1234);
        assert_eq!(quotes[1].pair.dest(), "EUR");
    }

    #[tokio::test]
    async fn test_absent_pair_is_none() {
        let source = NbuSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());
        let pair = CurrencyPair::new("UAH", "GBP").unwrap();

        let quote = source.rate(&pair, Some(&payload)).await.unwrap();

        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_malformed_rate_is_parse_error() {
        let source = NbuSource::new();
        let payload = SourcePayload::new(
            r#"<table id="exchangeRates"><tbody>
               <tr><td>840</td><td>USD</td><td>1</td><td>x</td><td>not-a-number</td></tr>
               </tbody></table>"#
                .to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_lowercase_code_is_parse_error() {
        let source = NbuSource::new();
        let payload = SourcePayload::new(
            r#"<table id="exchangeRates"><tbody>
               <tr><td>840</td><td>usd</td><td>1</td><td>x</td><td>27,00</td></tr>
               </tbody></table>"#
                .to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
