//! UkrGasBank cash-rate source.
//!
//! Scrapes the kurs page. The currency code is only present as an
//! `icon-<ccy>` CSS class on the flag cell, and the published amounts are per
//! N units of the destination currency, so both rates are divided by the unit
//! count from the second column.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::errors::SourceError;
use crate::models::{CurrencyPair, RateQuote};
use crate::source::html::{cell_text, select_all};
use crate::source::{RateSource, SourcePayload};

/// Source ID constant
const SOURCE_ID: &str = "UKRGASBANK";

const RATES_URL: &str = "https://www.ukrgasbank.com/kurs";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cash exchange-rate source for UkrGasBank.
pub struct UkrGasBankSource {
    client: Client,
}

impl UkrGasBankSource {
    /// Create a new UkrGasBank source.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn destination_code(row: &ElementRef<'_>) -> Result<String, SourceError> {
        let selector = Selector::parse("td.icon")
            .map_err(|e| SourceError::parse(SOURCE_ID, format!("bad selector: {e}")))?;
        let cell = row
            .select(&selector)
            .next()
            .ok_or_else(|| SourceError::parse(SOURCE_ID, "missing icon cell"))?;

        let code = cell
            .value()
            .classes()
            .filter(|class| *class != "icon")
            .filter_map(|class| class.split('-').nth(1))
            .next()
            .ok_or_else(|| SourceError::parse(SOURCE_ID, "missing icon-<ccy> class"))?;

        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(SourceError::parse(
                SOURCE_ID,
                format!("invalid currency code: {code:?}"),
            ));
        }

        Ok(code.to_uppercase())
    }

    /// Number of destination-currency units the published amounts refer to.
    fn unit(row: &ElementRef<'_>) -> Result<u32, SourceError> {
        let text = cell_text(SOURCE_ID, row, 1)?;
        let token = text
            .split_whitespace()
            .next()
            .ok_or_else(|| SourceError::parse(SOURCE_ID, "empty unit cell"))?;
        token
            .parse::<u32>()
            .map_err(|_| SourceError::parse(SOURCE_ID, format!("invalid unit value: {token:?}")))
    }

    fn rate_per_unit(row: &ElementRef<'_>, index: usize, unit: u32) -> Result<f64, SourceError> {
        let text = cell_text(SOURCE_ID, row, index)?;
        let amount = text
            .parse::<f64>()
            .map_err(|_| SourceError::parse(SOURCE_ID, format!("invalid rate value: {text:?}")))?;
        Ok(amount / f64::from(unit))
    }
}

impl Default for UkrGasBankSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for UkrGasBankSource {
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
        let rows = select_all(&document, "div.kurs-full > table tr")?;

        let mut quotes = Vec::new();
        // The first row is the table header.
        for row in rows.into_iter().skip(1) {
            let dest = Self::destination_code(&row)?;
            let unit = Self::unit(&row)?;
            let buy = Self::rate_per_unit(&row, 2, unit)?;
            let sale = Self::rate_per_unit(&row, 3, unit)?;
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
        <div class="kurs-full">
          <table>
            <tr><th>Валюта</th><th>К-сть</th><th>Купівля</th><th>Продаж</th></tr>
            <tr>
              <td class="icon icon-usd"></td><td>1 USD</td><td>27.10</td><td>27.55</td>
            </tr>
            <tr>
              <td class="icon icon-eur"></td><td>10 EUR</td><td>302.00</td><td>308.50</td>
            </tr>
          </table>
        </div>
    "#;

    #[tokio::test]
    async fn test_divides_by_unit_count() {
        let source = UkrGasBankSource::new();
        let payload = SourcePayload::new(FIXTURE.to_string());

        let quotes = source.rates(Some(&payload)).await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair.dest(), "USD");
        assert_eq!(quotes[0].buy_rate, 27.10);
        assert_eq!(quotes[1].pair.dest(), "EUR");
        assert_eq!(quotes[1].buy_rate, 30.20);
        assert_eq!(quotes[1].sale_rate, 30.85);
    }

    #[tokio::test]
    async fn test_missing_icon_class_is_parse_error() {
        let source = UkrGasBankSource::new();
        let payload = SourcePayload::new(
            r#"<div class="kurs-full"><table>
               <tr><th>h</th></tr>
               <tr><td>USD</td><td>1 USD</td><td>27.10</td><td>27.55</td></tr>
               </table></div>"#
                .to_string(),
        );

        let result = source.rates(Some(&payload)).await;

        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }
}
