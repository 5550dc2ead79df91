//! Exchange-rate domain model.
//!
//! An [`ExchangeRate`] is one source's view of a currency pair at a point in
//! time, together with the observers interested in its lifecycle. Its data
//! fields travel as a [`RateSnapshot`]: the value copy taken before every
//! mutation, handed to observers, and persisted in the state store between
//! runs. Observers are never part of the persisted form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::RateError;
use super::observer::RateObserver;
use super::store::state_key;
use crate::constants::RATE_TOLERANCE;
use ratewatch_sources::{is_valid_currency_code, CurrencyPair, RateQuote, RateSource};

/// Immutable value copy of an exchange rate's data fields.
///
/// This is the wire form: what observers receive as the pre/post state of a
/// mutation, and what the state store persists under the rate's key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Identifier of the source that produced the rate
    pub source_id: String,
    /// Base currency code, e.g. "UAH"
    pub base_currency: String,
    /// Destination currency code, e.g. "USD"
    pub destination_currency: String,
    /// Buy rate, strictly positive
    pub buy_rate: f64,
    /// Sale rate, strictly positive
    pub sale_rate: f64,
    /// When the rate was observed
    pub observed_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// The state-store key identifying this rate's series.
    pub fn state_key(&self) -> String {
        state_key(
            &self.source_id,
            &self.base_currency,
            &self.destination_currency,
        )
    }

    /// Encode for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RateError> {
        serde_json::to_vec(self).map_err(|e| RateError::Serialization(e.to_string()))
    }

    /// Decode a persisted snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RateError> {
        serde_json::from_slice(bytes).map_err(|e| RateError::Serialization(e.to_string()))
    }
}

/// One source's buy/sell view of a currency pair, with attached observers.
///
/// The entity is updated in place when a newer observation for the same
/// `(source, base, destination)` key arrives; every update notifies the
/// observers, and an update that moved a rate beyond [`RATE_TOLERANCE`]
/// additionally fires the changed callback.
pub struct ExchangeRate {
    source_id: String,
    base_currency: String,
    destination_currency: String,
    buy_rate: f64,
    sale_rate: f64,
    observed_at: DateTime<Utc>,
    observers: Vec<Arc<dyn RateObserver>>,
}

impl ExchangeRate {
    /// Build a fully initialized rate from explicit values.
    ///
    /// `observed_at` defaults to the current time when the caller has no
    /// source-supplied timestamp. Rates and timestamp are set together;
    /// a validation failure leaves nothing half-built.
    pub fn new(
        source_id: &str,
        base_currency: &str,
        destination_currency: &str,
        buy_rate: f64,
        sale_rate: f64,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, RateError> {
        for code in [base_currency, destination_currency] {
            if !is_valid_currency_code(code) {
                return Err(RateError::InvalidCurrencyCode(code.to_string()));
            }
        }

        let mut rate = Self {
            source_id: source_id.to_string(),
            base_currency: base_currency.to_string(),
            destination_currency: destination_currency.to_string(),
            buy_rate: f64::NAN,
            sale_rate: f64::NAN,
            observed_at: Utc::now(),
            observers: Vec::new(),
        };
        rate.set_rates(buy_rate, sale_rate, observed_at)?;
        Ok(rate)
    }

    /// Build from a raw source record.
    pub fn from_quote(quote: RateQuote) -> Result<Self, RateError> {
        Self::new(
            quote.source_id,
            quote.pair.base(),
            quote.pair.dest(),
            quote.buy_rate,
            quote.sale_rate,
            Some(quote.observed_at),
        )
    }

    /// Ask a source for the current rate of `pair` and build the entity
    /// from the answer.
    ///
    /// Fails with [`RateError::RateNotFound`] when the source does not
    /// publish the pair.
    pub async fn from_source(
        source: &dyn RateSource,
        pair: &CurrencyPair,
    ) -> Result<Self, RateError> {
        let quote = source
            .rate(pair, None)
            .await?
            .ok_or_else(|| RateError::RateNotFound {
                base: pair.base().to_string(),
                dest: pair.dest().to_string(),
            })?;
        Self::from_quote(quote)
    }

    /// Rebuild from a persisted snapshot. No observers are attached.
    pub fn from_snapshot(snapshot: RateSnapshot) -> Result<Self, RateError> {
        Self::new(
            &snapshot.source_id,
            &snapshot.base_currency,
            &snapshot.destination_currency,
            snapshot.buy_rate,
            snapshot.sale_rate,
            Some(snapshot.observed_at),
        )
    }

    /// Replace the rates with a newer observation.
    ///
    /// Takes a value copy of the pre-update state, mutates, then always
    /// notifies `rate_updated(pre, post)` and notifies
    /// `rate_changed(pre, post)` only when a rate moved beyond
    /// [`RATE_TOLERANCE`]. Validation failures mutate nothing and notify
    /// nobody.
    pub async fn update(
        &mut self,
        buy_rate: f64,
        sale_rate: f64,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<(), RateError> {
        let pre = self.snapshot();
        self.set_rates(buy_rate, sale_rate, observed_at)?;
        let post = self.snapshot();

        for observer in &self.observers {
            observer.rate_updated(&pre, &post).await;
        }

        if rates_changed(&pre, &post) {
            for observer in &self.observers {
                observer.rate_changed(&pre, &post).await;
            }
        }

        Ok(())
    }

    /// Attach an observer. Attaching the same observer twice is a no-op.
    pub fn attach(&mut self, observer: Arc<dyn RateObserver>) {
        if !self
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer))
        {
            self.observers.push(observer);
        }
    }

    /// Detach an observer. Detaching a non-member is a no-op.
    pub fn detach(&mut self, observer: &Arc<dyn RateObserver>) {
        self.observers
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    /// Fire the created callback on all observers.
    ///
    /// Used exactly once per key, the first run that observes it.
    pub async fn notify_created(&self) {
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.rate_created(&snapshot).await;
        }
    }

    /// Identifier of the source that produced this rate.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Base currency code.
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Destination currency code.
    pub fn destination_currency(&self) -> &str {
        &self.destination_currency
    }

    /// Buy rate.
    pub fn buy_rate(&self) -> f64 {
        self.buy_rate
    }

    /// Sale rate.
    pub fn sale_rate(&self) -> f64 {
        self.sale_rate
    }

    /// When the current values were observed.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// The state-store key identifying this rate's series.
    pub fn state_key(&self) -> String {
        state_key(
            &self.source_id,
            &self.base_currency,
            &self.destination_currency,
        )
    }

    /// Value copy of the data fields.
    pub fn snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            source_id: self.source_id.clone(),
            base_currency: self.base_currency.clone(),
            destination_currency: self.destination_currency.clone(),
            buy_rate: self.buy_rate,
            sale_rate: self.sale_rate,
            observed_at: self.observed_at,
        }
    }

    fn set_rates(
        &mut self,
        buy_rate: f64,
        sale_rate: f64,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<(), RateError> {
        if !(buy_rate > 0.0) || !(sale_rate > 0.0) {
            return Err(RateError::InvalidRate(format!(
                "rates must be positive: buy={buy_rate}, sale={sale_rate}"
            )));
        }
        self.buy_rate = buy_rate;
        self.sale_rate = sale_rate;
        self.observed_at = observed_at.unwrap_or_else(Utc::now);
        Ok(())
    }
}

/// True when either rate moved beyond the change-detection tolerance.
fn rates_changed(pre: &RateSnapshot, post: &RateSnapshot) -> bool {
    (pre.buy_rate - post.buy_rate).abs() > RATE_TOLERANCE
        || (pre.sale_rate - post.sale_rate).abs() > RATE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingObserver {
        created: AtomicUsize,
        updated: AtomicUsize,
        changed: AtomicUsize,
    }

    #[async_trait]
    impl RateObserver for CountingObserver {
        async fn rate_created(&self, _rate: &RateSnapshot) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }

        async fn rate_updated(&self, _pre: &RateSnapshot, _post: &RateSnapshot) {
            self.updated.fetch_add(1, Ordering::SeqCst);
        }

        async fn rate_changed(&self, _pre: &RateSnapshot, _post: &RateSnapshot) {
            self.changed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn rate(buy: f64, sale: f64) -> ExchangeRate {
        ExchangeRate::new("NBU", "UAH", "USD", buy, sale, None).unwrap()
    }

    #[test]
    fn test_construction_round_trip() {
        let rate = rate(27.0, 27.5);

        assert_eq!(rate.source_id(), "NBU");
        assert_eq!(rate.base_currency(), "UAH");
        assert_eq!(rate.destination_currency(), "USD");
        assert_eq!(rate.buy_rate(), 27.0);
        assert_eq!(rate.sale_rate(), 27.5);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            ExchangeRate::new("NBU", "UAH", "USD", 0.0, 27.5, None),
            Err(RateError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::new("NBU", "UAH", "USD", 27.0, -0.5, None),
            Err(RateError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::new("NBU", "uah", "USD", 27.0, 27.5, None),
            Err(RateError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            ExchangeRate::new("NBU", "UAH", "DOLLARS", 27.0, 27.5, None),
            Err(RateError::InvalidCurrencyCode(_))
        ));
    }

    #[tokio::test]
    async fn test_update_fires_updated_every_time_changed_once() {
        let mut rate = rate(27.0, 27.5);
        let observer = Arc::new(CountingObserver::default());
        rate.attach(observer.clone());

        rate.update(27.2, 27.7, None).await.unwrap();
        rate.update(27.2, 27.7, None).await.unwrap();

        assert_eq!(observer.updated.load(Ordering::SeqCst), 2);
        assert_eq!(observer.changed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sub_tolerance_move_is_not_a_change() {
        let mut rate = rate(27.0, 27.5);
        let observer = Arc::new(CountingObserver::default());
        rate.attach(observer.clone());

        rate.update(27.0 + 1e-6, 27.5 - 1e-6, None).await.unwrap();

        assert_eq!(observer.updated.load(Ordering::SeqCst), 1);
        assert_eq!(observer.changed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_decimal_move_is_a_change() {
        let mut rate = rate(27.0, 27.5);
        let observer = Arc::new(CountingObserver::default());
        rate.attach(observer.clone());

        rate.update(27.01, 27.5, None).await.unwrap();

        assert_eq!(observer.changed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_update_mutates_and_notifies_nothing() {
        let mut rate = rate(27.0, 27.5);
        let observer = Arc::new(CountingObserver::default());
        rate.attach(observer.clone());

        let result = rate.update(-1.0, 27.7, None).await;

        assert!(result.is_err());
        assert_eq!(rate.buy_rate(), 27.0);
        assert_eq!(rate.sale_rate(), 27.5);
        assert_eq!(observer.updated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_created_fans_out_to_all_observers_once() {
        let mut rate = rate(27.0, 27.5);
        let observers: Vec<_> = (0..3)
            .map(|_| Arc::new(CountingObserver::default()))
            .collect();
        for observer in &observers {
            rate.attach(observer.clone() as Arc<dyn RateObserver>);
        }

        rate.notify_created().await;

        for observer in &observers {
            assert_eq!(observer.created.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_attach_is_idempotent_and_detach_silences() {
        let mut rate = rate(27.0, 27.5);
        let observer = Arc::new(CountingObserver::default());
        let as_dyn: Arc<dyn RateObserver> = observer.clone();

        rate.attach(as_dyn.clone());
        rate.attach(as_dyn.clone());
        rate.notify_created().await;
        assert_eq!(observer.created.load(Ordering::SeqCst), 1);

        rate.detach(&as_dyn);
        // Detaching again is a no-op.
        rate.detach(&as_dyn);
        rate.notify_created().await;
        assert_eq!(observer.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_keys_differ_by_source() {
        let nbu = ExchangeRate::new("NBU", "UAH", "USD", 27.0, 27.5, None).unwrap();
        let privat = ExchangeRate::new("PRIVATBANK", "UAH", "USD", 27.0, 27.5, None).unwrap();

        assert_eq!(nbu.state_key(), "NBU:UAH:USD");
        assert_eq!(privat.state_key(), "PRIVATBANK:UAH:USD");
        assert_ne!(nbu.state_key(), privat.state_key());
    }

    #[test]
    fn test_snapshot_round_trips_through_bytes() {
        let rate = rate(27.0, 27.5);
        let snapshot = rate.snapshot();

        let bytes = snapshot.to_bytes().unwrap();
        let decoded = RateSnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_corrupt_snapshot_bytes_fail_to_decode() {
        assert!(matches!(
            RateSnapshot::from_bytes(b"not-json"),
            Err(RateError::Serialization(_))
        ));
    }
}
