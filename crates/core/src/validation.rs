//! Typed validation of requested amounts.
//!
//! Every externally supplied amount passes through here before the engine
//! sees it. Accepted amounts are strictly positive, carry at most two
//! decimal places, and fit the ledger's `15,2` precision.

use koruna_shared::types::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// Largest amount the ledger can record (15 significant digits, 2 decimal).
pub const MAX_AMOUNT: Decimal = dec!(9_999_999_999_999.99);

/// Maximum number of decimal places an amount may carry.
pub const AMOUNT_SCALE: u32 = 2;

/// Errors raised while validating a requested amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Amount must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),

    /// Amount carries more decimal places than the currency supports.
    #[error("amount {0} has more than {AMOUNT_SCALE} decimal places")]
    TooPrecise(Decimal),

    /// Amount exceeds the ledger's precision.
    #[error("amount {0} exceeds the maximum of {MAX_AMOUNT}")]
    TooLarge(Decimal),
}

impl ValidationError {
    /// Returns the stable error code for this rejection.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotPositive(_) => "AMOUNT_NOT_POSITIVE",
            Self::TooPrecise(_) => "AMOUNT_TOO_PRECISE",
            Self::TooLarge(_) => "AMOUNT_TOO_LARGE",
        }
    }
}

/// Validates a raw amount, returning it unchanged on success.
///
/// # Errors
///
/// Returns [`ValidationError`] if the amount is zero or negative, carries
/// more than two meaningful decimal places, or exceeds [`MAX_AMOUNT`].
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive(amount));
    }
    // normalize() strips trailing zeros so 10.5000 still passes.
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::TooPrecise(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::TooLarge(amount));
    }
    Ok(amount)
}

/// Validates a money value, returning it unchanged on success.
///
/// # Errors
///
/// Returns [`ValidationError`] if the amount fails [`validate_amount`].
pub fn validate_money(money: Money) -> Result<Money, ValidationError> {
    validate_amount(money.amount)?;
    Ok(money)
}
