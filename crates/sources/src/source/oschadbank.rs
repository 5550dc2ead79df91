//! OschadBank cash-rate source.
//!
//! Scrapes the private-customer currency table: destination code in the first
//! column, buy and sale rates in columns five and six.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::Duration;

use crate::errors::SourceError;
use crate::models::{is_valid_currency_code, CurrencyPair, RateQuote};
use crate::source::html::{cell_text, select_all};
use crate::source::{RateSource, SourcePayload};

/// Source ID constant
const SOURCE_ID: &str = "OSCHADBANK";

const RATES_URL: &str = "https://www.oschadbank.ua/ua/private/currency";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cash exchange-rate source for OschadBank.
pub struct OschadBankSource {
    client: Client,
}

impl OschadBankSource {
    /// Create a new OschadBank source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn destination_code(row: &ElementRef<'_>) -> Result<String, SourceError> {
        let code = cell_text(SOURCE_ID, row, 0)?;
        if !is_valid_currency_code(&code) {
            return Err(SourceError::parse(
                SOURCE_ID,
                format!("invalid currency code: {code:?}"),
            ));
        }
        Ok(code)
    }

    fn rate(row: &ElementRef<'_>, index: usize) -> Result<f64, SourceError> {
        let text = cell_text(SOURCE_ID, row, index)?;
        text.parse::<f64>()
            .map_err(|_| SourceError::parse(SOURCE_ID, format!("invalid rate value: {text:?}")))
    }
}

impl Default for OschadBankSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for OschadBankSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn poll(&self) -> Result<SourcePayload, SourceError> {
        let response = self
            .client
            .get(RATES_URL)
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
        let rows = select_all(&document, "table#currency_date_result > tbody > tr")?;

        let mut quotes = Vec::new();
        for row in rows {
            let dest = Self::destination_code(&row)?;
            let buy = Self::rate(&row, 5)?;
            let sale = Self::rate(&row, 6)?;
            let pair = CurrencyPair::new("UAH", &dest)?;
            quotes.push(RateQuote::new(SOURCE_ID, pair, buy, sale)?);
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <table id="currency_date_result">
          <tbody>
            <tr>
              <td>USD</td><td>долар США</td><td>100</td><td>-</td><td>-</td>
              <td>27.05</td><td>27.45</td>
            </tr>
            <tr>
              <td>EUR</td><td>євро</td><td>100</td><td>-</td><td>-</td>
              <td>30.20</td><td>30.90</td>
            </tr>
          </tbody>
        </table>
    "#;

    #[tokio::test]
    async fn test_parses_buy_and_sale_columns() {
        let source = OschadBankSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());

        let quotes = source.rates(Some(&payload)).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair.dest(), "USD");
        assert_eq!(quotes[0].buy_rate, 27.05);
        assert_eq!(quotes[0].sale_rate, 27.45);
    }

    #[tokio::test]
    async fn test_missing_sale_cell_is_parse_error() {
        let source = OschadBankSource::new();
        let payload = SourcePayload::new(
            r#"<table id="currency_date_result"><tbody>
               <tr><td>USD</td><td>x</td><td>100</td><td>-</td><td>-</td><td>27.05</td></tr>
               </tbody></table>"#
                .to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
