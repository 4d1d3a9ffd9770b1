//! User and bank account domain types and rules.
//!
//! A user owns at most one bank account per currency and may designate one
//! of them as the primary account. The primary account funds transfers when
//! no account in the requested currency can, and it is the default target
//! for deposits and withdrawals.

use chrono::{DateTime, Utc};
use koruna_shared::types::{AccountNumber, BankAccountId, CurrencyCode, UserAccountId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered user of the bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique identifier.
    pub id: UserAccountId,
    /// Login name, unique across the bank.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Shared secret for one-time passwords, if provisioned.
    pub otp_secret: Option<String>,
    /// Whether one-time password verification is active.
    pub otp_enabled: bool,
    /// The account cross-currency operations fall back to.
    pub primary_account: Option<BankAccountId>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A single-currency bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique identifier.
    pub id: BankAccountId,
    /// Customer-facing account number.
    pub number: AccountNumber,
    /// The user who owns this account.
    pub owner: UserAccountId,
    /// Currency the balance is denominated in.
    pub currency: CurrencyCode,
    /// Current balance; may go negative within the overdraft allowance.
    pub balance: Decimal,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
}

/// Errors raised by account management operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No user with this ID exists.
    #[error("user not found: {0}")]
    UserNotFound(UserAccountId),

    /// The username is already taken.
    #[error("username {0:?} is already taken")]
    DuplicateUsername(String),

    /// No account with this ID exists.
    #[error("account not found: {0}")]
    AccountNotFound(BankAccountId),

    /// The account exists but belongs to a different user.
    #[error("account {account} is not owned by user {user}")]
    NotOwned {
        /// The acting user.
        user: UserAccountId,
        /// The account they tried to use.
        account: BankAccountId,
    },

    /// The user already holds an account in this currency.
    #[error("user {user} already has a {currency} account")]
    DuplicateCurrency {
        /// The acting user.
        user: UserAccountId,
        /// The currency of the requested account.
        currency: CurrencyCode,
    },

    /// Accounts can only be closed once their balance reaches zero.
    #[error("account {account} still has a balance of {balance}")]
    BalanceNotZero {
        /// The account being closed.
        account: BankAccountId,
        /// Its remaining balance.
        balance: Decimal,
    },

    /// The user has not designated a primary account.
    #[error("user {0} has no primary account")]
    NoPrimaryAccount(UserAccountId),
}

impl AccountError {
    /// Returns the stable error code for this rejection.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NotOwned { .. } => "ACCOUNT_NOT_OWNED",
            Self::DuplicateCurrency { .. } => "DUPLICATE_CURRENCY",
            Self::BalanceNotZero { .. } => "BALANCE_NOT_ZERO",
            Self::NoPrimaryAccount(_) => "NO_PRIMARY_ACCOUNT",
        }
    }
}

impl UserAccount {
    /// Creates a new user with no accounts and no OTP provisioned.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: UserAccountId::new(),
            username: username.into(),
            email: email.into(),
            otp_secret: None,
            otp_enabled: false,
            primary_account: None,
            created_at: at,
        }
    }

    /// Stores an OTP secret and activates verification.
    pub fn enable_otp(&mut self, secret: impl Into<String>) {
        self.otp_secret = Some(secret.into());
        self.otp_enabled = true;
    }

    /// Deactivates OTP verification and discards the secret.
    pub fn disable_otp(&mut self) {
        self.otp_secret = None;
        self.otp_enabled = false;
    }
}

impl BankAccount {
    /// Opens a new account with a zero balance.
    #[must_use]
    pub fn new(
        number: AccountNumber,
        owner: UserAccountId,
        currency: CurrencyCode,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BankAccountId::new(),
            number,
            owner,
            currency,
            balance: Decimal::ZERO,
            created_at: at,
        }
    }

    /// Returns true if the balance covers `amount` without any overdraft.
    #[must_use]
    pub fn covers(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

/// Checks that `user` owns `account`.
///
/// # Errors
///
/// Returns [`AccountError::NotOwned`] otherwise.
pub fn ensure_owned(account: &BankAccount, user: UserAccountId) -> Result<(), AccountError> {
    if account.owner == user {
        Ok(())
    } else {
        Err(AccountError::NotOwned {
            user,
            account: account.id,
        })
    }
}

/// Checks that `account` can be closed.
///
/// # Errors
///
/// Returns [`AccountError::BalanceNotZero`] while any balance, positive or
/// negative, remains.
pub fn ensure_closable(account: &BankAccount) -> Result<(), AccountError> {
    if account.balance.is_zero() {
        Ok(())
    } else {
        Err(AccountError::BalanceNotZero {
            account: account.id,
            balance: account.balance,
        })
    }
}
