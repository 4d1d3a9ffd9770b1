//! Transaction engine: turns requests into plans.
//!
//! Every planning function takes the relevant account state and a rate
//! lookup closure, validates the request, and produces a plan or a typed
//! rejection. No state is touched; the caller applies plans under its own
//! locks so that check and apply observe the same balances.

use koruna_shared::types::{BankAccountId, CurrencyCode, Money, UserAccountId};
use rust_decimal::Decimal;

use crate::account::BankAccount;
use crate::currency::convert_via_base;
use crate::validation::validate_money;

use super::error::EngineError;
use super::overdraft;
use super::types::{DepositPlan, FundingRoute, TransferPlan, WithdrawalPlan};

/// Converts a validated amount into `target` without consulting rates when
/// the currencies already match.
fn into_currency<R>(
    money: &Money,
    target: CurrencyCode,
    rate_of: &R,
) -> Result<Decimal, EngineError>
where
    R: Fn(CurrencyCode) -> Option<Decimal>,
{
    if money.currency == target {
        return Ok(money.amount);
    }
    let source_rate =
        rate_of(money.currency).ok_or(EngineError::UnknownCurrency(money.currency))?;
    let target_rate = rate_of(target).ok_or(EngineError::UnknownCurrency(target))?;
    Ok(convert_via_base(money.amount, source_rate, target_rate))
}

/// Converts a money value into the target currency.
///
/// Routes through the base currency and rounds once. Converting into the
/// same currency returns the amount unchanged.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for malformed amounts and
/// [`EngineError::UnknownCurrency`] when either side has no quoted rate.
pub fn convert_money<R>(
    money: Money,
    target: CurrencyCode,
    rate_of: R,
) -> Result<Money, EngineError>
where
    R: Fn(CurrencyCode) -> Option<Decimal>,
{
    let money = validate_money(money)?;
    let amount = into_currency(&money, target, &rate_of)?;
    Ok(Money::new(amount, target))
}

/// Transaction engine for planning balance changes.
///
/// Pure business logic with no storage dependencies. Rate lookups are
/// injected so the caller decides which rate snapshot an operation sees.
pub struct TransactionEngine;

impl TransactionEngine {
    /// Plans a deposit into `account`.
    ///
    /// The requested amount is converted into the account's currency.
    /// Deposits never fail for balance reasons and never carry a fee.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for malformed amounts and
    /// [`EngineError::UnknownCurrency`] for unquoted currencies.
    pub fn plan_deposit<R>(
        account: &BankAccount,
        money: Money,
        rate_of: R,
    ) -> Result<DepositPlan, EngineError>
    where
        R: Fn(CurrencyCode) -> Option<Decimal>,
    {
        let money = validate_money(money)?;
        let credit = into_currency(&money, account.currency, &rate_of)?;
        Ok(DepositPlan {
            account: account.id,
            credit,
        })
    }

    /// Plans a withdrawal from `account`.
    ///
    /// The requested amount is converted into the account's currency and
    /// assessed against the overdraft rule: the debit may exceed the
    /// balance by up to ten percent, and the uncovered part carries a ten
    /// percent fee.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientFunds`] when the debit exceeds
    /// the overdraft limit, plus the validation and rate errors of
    /// [`TransactionEngine::plan_deposit`].
    pub fn plan_withdrawal<R>(
        account: &BankAccount,
        money: Money,
        rate_of: R,
    ) -> Result<WithdrawalPlan, EngineError>
    where
        R: Fn(CurrencyCode) -> Option<Decimal>,
    {
        let money = validate_money(money)?;
        let debit = into_currency(&money, account.currency, &rate_of)?;
        let assessment = overdraft::assess(account.balance, debit).ok_or_else(|| {
            EngineError::InsufficientFunds {
                requested: debit,
                limit: overdraft::withdrawable_limit(account.balance),
                currency: account.currency,
            }
        })?;
        Ok(WithdrawalPlan {
            account: account.id,
            debit,
            fee: assessment.fee,
            new_balance: assessment.new_balance,
        })
    }

    /// Chooses which of the sender's accounts funds a transfer.
    ///
    /// Prefers the oldest account already denominated in the requested
    /// currency whose balance covers the amount outright; otherwise falls
    /// back to the primary account. `accounts` must be in opening order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoPrimaryAccount`] when no account qualifies
    /// and no primary is designated, or [`EngineError::Validation`] for
    /// malformed amounts.
    pub fn resolve_funding(
        user: UserAccountId,
        accounts: &[BankAccount],
        primary: Option<BankAccountId>,
        money: Money,
    ) -> Result<FundingRoute, EngineError> {
        let money = validate_money(money)?;
        if let Some(account) = accounts
            .iter()
            .find(|account| account.currency == money.currency && account.covers(money.amount))
        {
            return Ok(FundingRoute::SameCurrency(account.id));
        }
        primary
            .map(FundingRoute::Primary)
            .ok_or(EngineError::NoPrimaryAccount(user))
    }

    /// Plans a transfer out of `source` into `destination`.
    ///
    /// The branch is re-derived from the source state itself rather than
    /// trusted from an earlier [`TransactionEngine::resolve_funding`] call,
    /// because balances may have moved between selection and locking:
    ///
    /// - a source holding the requested currency with a covering balance is
    ///   debited the exact amount, fee-free;
    /// - otherwise, if `source_is_primary`, the amount is converted into
    ///   the source currency and the overdraft rule applies;
    /// - otherwise the transfer is refused.
    ///
    /// The destination is credited the amount converted into its own
    /// currency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientFunds`], plus the validation and
    /// rate errors of the conversions involved.
    pub fn plan_transfer<R>(
        source: &BankAccount,
        source_is_primary: bool,
        destination: &BankAccount,
        money: Money,
        rate_of: R,
    ) -> Result<TransferPlan, EngineError>
    where
        R: Fn(CurrencyCode) -> Option<Decimal>,
    {
        let money = validate_money(money)?;

        let (debit, fee, source_new_balance) =
            if source.currency == money.currency && source.covers(money.amount) {
                (
                    money.amount,
                    Decimal::ZERO,
                    source.balance - money.amount,
                )
            } else if source_is_primary {
                let debit = into_currency(&money, source.currency, &rate_of)?;
                let assessment = overdraft::assess(source.balance, debit).ok_or_else(|| {
                    EngineError::InsufficientFunds {
                        requested: debit,
                        limit: overdraft::withdrawable_limit(source.balance),
                        currency: source.currency,
                    }
                })?;
                (debit, assessment.fee, assessment.new_balance)
            } else {
                // A same-currency account chosen earlier no longer covers
                // the amount. Refuse rather than silently reroute.
                return Err(EngineError::InsufficientFunds {
                    requested: money.amount,
                    limit: source.balance,
                    currency: source.currency,
                });
            };

        let credit = into_currency(&money, destination.currency, &rate_of)?;

        Ok(TransferPlan {
            source: source.id,
            debit,
            fee,
            source_new_balance,
            destination: destination.id,
            credit,
        })
    }
}
