//! Exchange rate table backed by the CNB daily feed.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use koruna_core::currency::{parse_daily_feed, ExchangeRate, FeedError};
use koruna_core::engine::{convert_money, EngineError};
use koruna_shared::types::{CurrencyCode, Money};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised while refreshing the rate table from the feed.
#[derive(Debug, Error)]
pub enum RatesError {
    /// The feed could not be fetched.
    #[error("rate feed unavailable: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed was fetched but could not be parsed.
    #[error("rate feed malformed: {0}")]
    Feed(#[from] FeedError),
}

impl RatesError {
    /// Returns the stable error code for this failure.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "FEED_UNAVAILABLE",
            Self::Feed(_) => "FEED_MALFORMED",
        }
    }
}

/// Point-in-time snapshot of per-unit rates for synchronous planning code.
///
/// Taken once per operation, before any account lock, so a concurrent
/// refresh cannot change the rates mid-transaction.
#[derive(Debug, Clone)]
pub struct RateLookup {
    rates: HashMap<CurrencyCode, Decimal>,
}

impl RateLookup {
    /// Per-unit rate for `currency` at the time the snapshot was taken.
    #[must_use]
    pub fn rate_of(&self, currency: CurrencyCode) -> Option<Decimal> {
        self.rates.get(&currency).copied()
    }
}

/// Table of per-unit rates quoted against the base currency.
///
/// The base currency is pinned at rate 1 and cannot be overwritten,
/// not even by a feed refresh.
#[derive(Debug)]
pub struct RateTable {
    base: CurrencyCode,
    feed_url: String,
    http: reqwest::Client,
    rates: RwLock<HashMap<CurrencyCode, ExchangeRate>>,
}

impl RateTable {
    /// Creates a table quoting against `base`, refreshing from `feed_url`.
    pub fn new(
        base: CurrencyCode,
        feed_url: String,
        http_timeout: Duration,
    ) -> Result<Self, RatesError> {
        let http = reqwest::Client::builder().timeout(http_timeout).build()?;
        let mut rates = HashMap::new();
        rates.insert(base, Self::base_rate(base));
        Ok(Self {
            base,
            feed_url,
            http,
            rates: RwLock::new(rates),
        })
    }

    /// The base currency every quote is expressed in.
    #[must_use]
    pub const fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Inserts or replaces the quote for one currency.
    ///
    /// Quotes for the base currency are ignored.
    pub async fn upsert(&self, rate: ExchangeRate) {
        if rate.currency == self.base {
            tracing::debug!(currency = %rate.currency, "ignoring quote for the base currency");
            return;
        }
        self.rates.write().await.insert(rate.currency, rate);
    }

    /// Replaces every quote at once, keeping the base pinned at 1.
    ///
    /// Currencies missing from `rates` are dropped, so a feed that stops
    /// quoting a currency stops us converting it.
    pub async fn replace_all(&self, rates: Vec<ExchangeRate>) {
        let mut table = HashMap::with_capacity(rates.len() + 1);
        for rate in rates {
            if rate.currency == self.base {
                continue;
            }
            table.insert(rate.currency, rate);
        }
        table.insert(self.base, Self::base_rate(self.base));
        *self.rates.write().await = table;
    }

    /// Per-unit rate for `currency`, if quoted.
    pub async fn rate_of(&self, currency: CurrencyCode) -> Option<Decimal> {
        self.rates.read().await.get(&currency).map(|rate| rate.rate)
    }

    /// Snapshots the per-unit rates for use inside a locked section.
    pub async fn lookup(&self) -> RateLookup {
        let rates = self
            .rates
            .read()
            .await
            .iter()
            .map(|(currency, rate)| (*currency, rate.rate))
            .collect();
        RateLookup { rates }
    }

    /// Every current quote, ordered by currency code.
    pub async fn snapshot(&self) -> Vec<ExchangeRate> {
        let mut rates: Vec<ExchangeRate> = self.rates.read().await.values().cloned().collect();
        rates.sort_by_key(|rate| rate.currency);
        rates
    }

    /// Converts `money` into `target` at the current quotes.
    pub async fn convert(&self, money: Money, target: CurrencyCode) -> Result<Money, EngineError> {
        let lookup = self.lookup().await;
        convert_money(money, target, |currency| lookup.rate_of(currency))
    }

    /// Fetches the daily feed and swaps the table in one step.
    ///
    /// On any error the previous quotes stay in place. Returns the number
    /// of currencies parsed from the feed.
    pub async fn refresh(&self) -> Result<usize, RatesError> {
        let body = self
            .http
            .get(&self.feed_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let parsed = parse_daily_feed(&body, Utc::now())?;
        let count = parsed.len();
        self.replace_all(parsed).await;
        tracing::info!(count, url = %self.feed_url, "exchange rates refreshed");
        Ok(count)
    }

    fn base_rate(base: CurrencyCode) -> ExchangeRate {
        ExchangeRate {
            currency: base,
            rate: Decimal::ONE,
            updated_at: Utc::now(),
        }
    }
}
