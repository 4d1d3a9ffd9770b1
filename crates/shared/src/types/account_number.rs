//! Fixed-format bank account numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in an account number.
pub const ACCOUNT_NUMBER_LEN: usize = 11;

const SEQUENCE_FLOOR: u64 = 10_000_000_000;
const SEQUENCE_SPAN: u64 = 90_000_000_000;

/// An eleven-digit account number as printed on statements.
///
/// Distinct from [`BankAccountId`](super::BankAccountId): the ID is the
/// internal reference, the number is the customer-facing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

/// Error returned when parsing an account number fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid account number {0:?}: expected exactly {ACCOUNT_NUMBER_LEN} digits")]
pub struct AccountNumberError(pub String);

impl AccountNumber {
    /// Parses an account number.
    ///
    /// # Errors
    ///
    /// Returns [`AccountNumberError`] unless the input is exactly eleven
    /// ASCII digits.
    pub fn new(raw: &str) -> Result<Self, AccountNumberError> {
        if raw.len() == ACCOUNT_NUMBER_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AccountNumberError(raw.to_string()))
        }
    }

    /// Derives the `n`-th number in the bank's numbering plan.
    ///
    /// Numbers start at `10000000000` and wrap within eleven digits, so the
    /// result always has exactly [`ACCOUNT_NUMBER_LEN`] digits.
    #[must_use]
    pub fn from_sequence(n: u64) -> Self {
        Self((SEQUENCE_FLOOR + n % SEQUENCE_SPAN).to_string())
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(number: AccountNumber) -> Self {
        number.0
    }
}
