//! Append-only transaction records.
//!
//! Every successful deposit, withdrawal, and transfer produces exactly one
//! record. Records keep the amount and currency as they were requested, not
//! as they were settled after conversion, so statements show what the
//! customer asked for. Conversions can be replayed from the rates in effect
//! at the time.

use chrono::{DateTime, Utc};
use koruna_shared::types::{BankAccountId, CurrencyCode, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of movement a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Funds added to an account.
    Deposit,
    /// Funds removed from an account.
    Withdrawal,
    /// Funds moved between two accounts.
    Transfer,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// A single ledger record.
///
/// For deposits and withdrawals `source` and `destination` are the same
/// account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier.
    pub id: TransactionId,
    /// What kind of movement this was.
    pub kind: TransactionKind,
    /// The account funds were taken from.
    pub source: BankAccountId,
    /// The account funds went to.
    pub destination: BankAccountId,
    /// The amount as originally requested.
    pub amount: Decimal,
    /// The currency the amount was requested in.
    pub currency: CurrencyCode,
    /// Fee charged for drawing past the balance, zero otherwise.
    pub overdraft_fee: Decimal,
    /// When the movement settled.
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Records a deposit into `account`.
    #[must_use]
    pub fn deposit(
        account: BankAccountId,
        amount: Decimal,
        currency: CurrencyCode,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind: TransactionKind::Deposit,
            source: account,
            destination: account,
            amount,
            currency,
            overdraft_fee: Decimal::ZERO,
            created_at: at,
        }
    }

    /// Records a withdrawal from `account`.
    #[must_use]
    pub fn withdrawal(
        account: BankAccountId,
        amount: Decimal,
        currency: CurrencyCode,
        overdraft_fee: Decimal,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind: TransactionKind::Withdrawal,
            source: account,
            destination: account,
            amount,
            currency,
            overdraft_fee,
            created_at: at,
        }
    }

    /// Records a transfer from `source` to `destination`.
    #[must_use]
    pub fn transfer(
        source: BankAccountId,
        destination: BankAccountId,
        amount: Decimal,
        currency: CurrencyCode,
        overdraft_fee: Decimal,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind: TransactionKind::Transfer,
            source,
            destination,
            amount,
            currency,
            overdraft_fee,
            created_at: at,
        }
    }

    /// Returns true if `account` appears on either side of this record.
    #[must_use]
    pub fn involves(&self, account: BankAccountId) -> bool {
        self.source == account || self.destination == account
    }
}
