//! Money type with decimal precision and an open currency code.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts wrap `rust_decimal::Decimal` for arbitrary precision.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major currency units (e.g. 100.50 CZK).
    pub amount: Decimal,
    /// Currency the amount is denominated in.
    pub currency: CurrencyCode,
}

/// A three-letter currency code in ISO 4217 style (e.g. "CZK", "EUR").
///
/// The set of codes is open rather than a closed enum: the daily rate feed
/// decides at runtime which currencies are actually quoted. Parsing only
/// enforces the shape, three ASCII letters, normalized to uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

/// Error returned when parsing a currency code fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code {0:?}: expected exactly three ASCII letters")]
pub struct CurrencyCodeError(pub String);

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl CurrencyCode {
    /// Parses a currency code, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyCodeError`] unless the input is exactly three
    /// ASCII letters.
    pub fn new(code: &str) -> Result<Self, CurrencyCodeError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyCodeError(code.to_string()));
        }
        let mut normalized = [0u8; 3];
        for (slot, byte) in normalized.iter_mut().zip(bytes) {
            *slot = byte.to_ascii_uppercase();
        }
        Ok(Self(normalized))
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Always ASCII uppercase by construction.
        for byte in self.0 {
            f.write_char(char::from(byte))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn czk() -> CurrencyCode {
        CurrencyCode::new("CZK").unwrap()
    }

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, czk());
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, czk());
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(czk());
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
    }

    #[test]
    fn test_money_is_negative() {
        let positive = Money::new(dec!(10), czk());
        assert!(!positive.is_negative());

        let negative = Money::new(dec!(-10), czk());
        assert!(negative.is_negative());

        let zero = Money::new(dec!(0), czk());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(dec!(1234.50), czk());
        assert_eq!(money.to_string(), "1234.50 CZK");
    }

    #[rstest]
    #[case("CZK", "CZK")]
    #[case("eur", "EUR")]
    #[case("uSd", "USD")]
    fn test_currency_code_normalizes_case(#[case] input: &str, #[case] expected: &str) {
        let code = CurrencyCode::new(input).unwrap();
        assert_eq!(code.to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("CZ")]
    #[case("CZKX")]
    #[case("C1K")]
    #[case("CZ ")]
    fn test_currency_code_rejects_malformed(#[case] input: &str) {
        assert!(CurrencyCode::new(input).is_err());
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!(CurrencyCode::from_str("czk").unwrap(), czk());
    }

    #[test]
    fn test_currency_code_serde_round_trip() {
        let json = serde_json::to_string(&czk()).unwrap();
        assert_eq!(json, "\"CZK\"");

        let parsed: CurrencyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, czk());
    }

    #[test]
    fn test_currency_code_orders_alphabetically() {
        let mut codes = vec![
            CurrencyCode::new("USD").unwrap(),
            CurrencyCode::new("CZK").unwrap(),
            CurrencyCode::new("EUR").unwrap(),
        ];
        codes.sort();
        let rendered: Vec<String> = codes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["CZK", "EUR", "USD"]);
    }
}
