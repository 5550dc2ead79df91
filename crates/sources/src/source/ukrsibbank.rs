//! UkrSibBank cash-rate source.
//!
//! Scrapes the currency-exchange page. The first cell mixes the code with a
//! human-readable label, so only its leading three characters are the code;
//! the rate cells interleave the amount with trend markup, so the first
//! numeric text node is the value.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::Duration;

use crate::errors::SourceError;
use crate::models::{is_valid_currency_code, CurrencyPair, RateQuote};
use crate::source::html::{cell_leading_number, cell_text, select_all};
use crate::source::{RateSource, SourcePayload};

/// Source ID constant
const SOURCE_ID: &str = "UKRSIBBANK";

const RATES_URL: &str = "https://my.ukrsibbank.com/ua/personal/operations/currency_exchange/";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cash exchange-rate source for UkrSibBank.
pub struct UkrSibBankSource {
    client: Client,
}

impl UkrSibBankSource {
    /// Create a new UkrSibBank source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn destination_code(row: &ElementRef<'_>) -> Result<String, SourceError> {
        let text = cell_text(SOURCE_ID, row, 0)?;
        let code: String = text.chars().take(3).collect();
        if !is_valid_currency_code(&code) {
            return Err(SourceError::parse(
                SOURCE_ID,
                format!("invalid currency code: {code:?}"),
            ));
        }
        Ok(code)
    }
}

impl Default for UkrSibBankSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for UkrSibBankSource {
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
        let rows = select_all(&document, "table.currency__table > tbody > tr")?;

        let mut quotes = Vec::new();
        for row in rows {
            let dest = Self::destination_code(&row)?;
            let buy = cell_leading_number(SOURCE_ID, &row, 1)?;
            let sale = cell_leading_number(SOURCE_ID, &row, 2)?;
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
        <table class="currency__table">
          <tbody>
            <tr>
              <td>USD долар США</td>
              <td><span class="up"></span>27.15<small>▲</small></td>
              <td><span class="up"></span>27.60<small>▲</small></td>
            </tr>
            <tr>
              <td>EUR євро</td>
              <td>30.25</td>
              <td>30.95</td>
            </tr>
          </tbody>
        </table>
    "#;

    #[tokio::test]
    async fn test_parses_leading_code_and_numeric_nodes() {
        let source = UkrSibBankSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());

        let quotes = source.rates(Some(&payload)).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair.dest(), "USD");
        assert_eq!(quotes[0].buy_rate, 27.15);
        assert_eq!(quotes[0].sale_rate, 27.60);
        assert_eq!(quotes[1].pair.dest(), "EUR");
        assert_eq!(quotes[1].buy_rate, 30.25);
    }

    #[tokio::test]
    async fn test_rate_cell_without_number_is_parse_error() {
        let source = UkrSibBankSource::new();
        let payload = SourcePayload::new(
            r#"<table class="currency__table"><tbody>
               <tr><td>USD долар</td><td><span>—</span></td><td>27.60</td></tr>
               </tbody></table>"#
                .to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
