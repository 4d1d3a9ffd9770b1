//! Plan types produced by the transaction engine.
//!
//! A plan is a description of balance changes that has passed every check.
//! All amounts are denominated in the currency of the account they apply
//! to, never in the currency of the request.

use koruna_shared::types::BankAccountId;
use rust_decimal::Decimal;

/// A planned credit to a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPlan {
    /// The account to credit.
    pub account: BankAccountId,
    /// The credit in the account's currency.
    pub credit: Decimal,
}

/// A planned debit from a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPlan {
    /// The account to debit.
    pub account: BankAccountId,
    /// The debit in the account's currency.
    pub debit: Decimal,
    /// Overdraft fee on top of the debit, zero when covered.
    pub fee: Decimal,
    /// The account's balance after debit and fee.
    pub new_balance: Decimal,
}

/// Which account funds a transfer, chosen from the sender's accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingRoute {
    /// An account denominated in the requested currency whose balance
    /// covers the amount outright. No conversion, no fee, no overdraft.
    SameCurrency(BankAccountId),
    /// The sender's primary account. The amount is converted into its
    /// currency and the overdraft rule applies.
    Primary(BankAccountId),
}

impl FundingRoute {
    /// The account this route draws from.
    #[must_use]
    pub const fn account(&self) -> BankAccountId {
        match self {
            Self::SameCurrency(id) | Self::Primary(id) => *id,
        }
    }
}

/// A planned movement between two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    /// The account funds are taken from.
    pub source: BankAccountId,
    /// The debit in the source account's currency.
    pub debit: Decimal,
    /// Overdraft fee in the source account's currency, zero when covered.
    pub fee: Decimal,
    /// The source account's balance after debit and fee.
    pub source_new_balance: Decimal,
    /// The account funds go to.
    pub destination: BankAccountId,
    /// The credit in the destination account's currency.
    pub credit: Decimal,
}
