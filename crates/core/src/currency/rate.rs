//! Exchange rate types.

use chrono::{DateTime, Utc};
use koruna_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exchange rate of a currency against the base currency.
///
/// Quotes one unit of `currency` in the base currency, so converting into
/// the base is a multiplication and converting out is a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The quoted currency.
    pub currency: CurrencyCode,
    /// Base currency units per one unit of `currency`.
    pub rate: Decimal,
    /// When this rate was last refreshed.
    pub updated_at: DateTime<Utc>,
}

/// Error returned when constructing an invalid exchange rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Rates must be strictly positive to be usable as divisors.
    #[error("rate for {currency} must be positive, got {rate}")]
    NotPositive {
        /// The quoted currency.
        currency: CurrencyCode,
        /// The offending rate.
        rate: Decimal,
    },
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::NotPositive`] if `rate` is zero or negative.
    pub fn new(
        currency: CurrencyCode,
        rate: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::NotPositive { currency, rate });
        }
        Ok(Self {
            currency,
            rate,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR").unwrap()
    }

    #[test]
    fn accepts_positive_rates() {
        let rate = ExchangeRate::new(eur(), dec!(24.50), Utc::now()).unwrap();
        assert_eq!(rate.currency, eur());
        assert_eq!(rate.rate, dec!(24.50));
    }

    #[test]
    fn rejects_zero_and_negative_rates() {
        assert!(ExchangeRate::new(eur(), dec!(0), Utc::now()).is_err());
        assert!(matches!(
            ExchangeRate::new(eur(), dec!(-1.5), Utc::now()),
            Err(RateError::NotPositive { rate, .. }) if rate == dec!(-1.5)
        ));
    }
}
