//! Engine error types for transaction rejections.

use koruna_shared::types::{AccountNumber, BankAccountId, CurrencyCode, UserAccountId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that reject a deposit, withdrawal, transfer, or conversion.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The debit would exceed the balance plus the overdraft allowance.
    #[error("insufficient funds: requested {requested} {currency}, limit is {limit} {currency}")]
    InsufficientFunds {
        /// The debit in the funding account's currency.
        requested: Decimal,
        /// The most that account can currently fund.
        limit: Decimal,
        /// The funding account's currency.
        currency: CurrencyCode,
    },

    /// No rate is quoted for this currency.
    #[error("no exchange rate for {0}")]
    UnknownCurrency(CurrencyCode),

    /// A cross-currency operation needs a primary account, and the user has
    /// none.
    #[error("user {0} has no primary account")]
    NoPrimaryAccount(UserAccountId),

    /// No user with this ID exists.
    #[error("user not found: {0}")]
    UserNotFound(UserAccountId),

    /// No account with this ID exists.
    #[error("account not found: {0}")]
    AccountNotFound(BankAccountId),

    /// No account with this number exists.
    #[error("no account with number {0}")]
    UnknownAccountNumber(AccountNumber),

    /// The requested amount failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EngineError {
    /// Returns the stable error code for this rejection.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::NoPrimaryAccount(_) => "NO_PRIMARY_ACCOUNT",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UnknownAccountNumber(_) => "UNKNOWN_ACCOUNT_NUMBER",
            Self::Validation(inner) => inner.error_code(),
        }
    }
}
