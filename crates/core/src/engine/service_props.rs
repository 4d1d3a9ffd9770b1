//! Property-based tests for the transaction engine.

use chrono::Utc;
use koruna_shared::types::{AccountNumber, CurrencyCode, Money, UserAccountId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::account::BankAccount;
use crate::currency::round_currency;
use crate::engine::error::EngineError;
use crate::engine::overdraft;
use crate::engine::service::TransactionEngine;

/// Strategy for positive cent amounts (0.01 to 20,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..2_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for balances, including overdrawn ones (-1,000.00 to 10,000.00).
fn any_balance() -> impl Strategy<Value = Decimal> {
    (-100_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for per-unit rates against the base (0.001 to 100.000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

fn czk() -> CurrencyCode {
    CurrencyCode::new("CZK").unwrap()
}

fn eur() -> CurrencyCode {
    CurrencyCode::new("EUR").unwrap()
}

fn account_with(currency: CurrencyCode, balance: Decimal) -> BankAccount {
    let mut account = BankAccount::new(
        AccountNumber::from_sequence(0),
        UserAccountId::new(),
        currency,
        Utc::now(),
    );
    account.balance = balance;
    account
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Overdraft arithmetic
    // =========================================================================

    /// For any balance and debit, a successful withdrawal never draws more
    /// than the balance plus ten percent, and the books stay consistent:
    /// new_balance = balance - debit - fee.
    #[test]
    fn prop_withdrawal_respects_the_overdraft_limit(
        balance in any_balance(),
        amount in positive_amount(),
    ) {
        let account = account_with(czk(), balance);
        let result = TransactionEngine::plan_withdrawal(
            &account,
            Money::new(amount, czk()),
            |_| Some(Decimal::ONE),
        );

        match result {
            Ok(plan) => {
                prop_assert!(plan.debit <= overdraft::withdrawable_limit(balance));
                prop_assert_eq!(plan.new_balance, balance - plan.debit - plan.fee);
            }
            Err(EngineError::InsufficientFunds { requested, limit, .. }) => {
                prop_assert!(requested > limit);
            }
            Err(other) => prop_assert!(false, "unexpected rejection: {other}"),
        }
    }

    /// For any withdrawal, the fee is exactly ten percent of the uncovered
    /// part, rounded to cents; fully covered debits are free.
    #[test]
    fn prop_fee_is_ten_percent_of_the_shortfall(
        balance in any_balance(),
        amount in positive_amount(),
    ) {
        let account = account_with(czk(), balance);
        if let Ok(plan) = TransactionEngine::plan_withdrawal(
            &account,
            Money::new(amount, czk()),
            |_| Some(Decimal::ONE),
        ) {
            let shortfall = (plan.debit - balance).max(Decimal::ZERO);
            let expected = round_currency(shortfall * overdraft::OVERDRAFT_FEE_RATE);
            prop_assert_eq!(plan.fee, expected);
            if plan.debit <= balance {
                prop_assert_eq!(plan.fee, Decimal::ZERO);
            }
        }
    }

    // =========================================================================
    // Conversion behavior
    // =========================================================================

    /// For any deposit, the credit equals the request converted through the
    /// base currency and rounded once to cents.
    #[test]
    fn prop_deposit_credit_matches_the_conversion(
        amount in positive_amount(),
        source_rate in positive_rate(),
        target_rate in positive_rate(),
    ) {
        let account = account_with(czk(), Decimal::ZERO);
        let rate_of = move |c: CurrencyCode| {
            if c == eur() { Some(source_rate) } else { Some(target_rate) }
        };

        let plan = TransactionEngine::plan_deposit(
            &account,
            Money::new(amount, eur()),
            rate_of,
        );

        prop_assert!(plan.is_ok());
        let expected = round_currency(amount * source_rate / target_rate);
        prop_assert_eq!(plan.unwrap().credit, expected);
    }

    /// For any two currencies quoted at the same rate, conversion between
    /// them is the identity on cent amounts.
    #[test]
    fn prop_equal_rates_convert_one_to_one(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let account = account_with(czk(), Decimal::ZERO);
        let plan = TransactionEngine::plan_deposit(
            &account,
            Money::new(amount, eur()),
            move |_| Some(rate),
        );

        prop_assert!(plan.is_ok());
        prop_assert_eq!(plan.unwrap().credit, amount);
    }

    // =========================================================================
    // Transfer branches
    // =========================================================================

    /// For any covering same-currency transfer, the debit is the exact
    /// requested amount and no fee is charged.
    #[test]
    fn prop_covered_same_currency_transfers_are_fee_free(
        amount in positive_amount(),
        headroom in 0i64..1_000_000i64,
    ) {
        let balance = amount + Decimal::new(headroom, 2);
        let source = account_with(eur(), balance);
        let destination = account_with(eur(), Decimal::ZERO);

        let plan = TransactionEngine::plan_transfer(
            &source,
            false,
            &destination,
            Money::new(amount, eur()),
            |_| Some(Decimal::ONE),
        );

        prop_assert!(plan.is_ok());
        let plan = plan.unwrap();
        prop_assert_eq!(plan.debit, amount);
        prop_assert_eq!(plan.fee, Decimal::ZERO);
        prop_assert_eq!(plan.credit, amount);
        prop_assert_eq!(plan.source_new_balance, balance - amount);
    }

    /// For any transfer plan, what leaves the source in base-currency terms
    /// is what arrives at the destination, up to the single cent rounding
    /// on each side.
    #[test]
    fn prop_transfer_conserves_value_through_the_base(
        amount in positive_amount(),
        source_rate in positive_rate(),
        destination_rate in positive_rate(),
    ) {
        let source = account_with(czk(), amount * dec!(100));
        let destination = account_with(eur(), Decimal::ZERO);
        let rate_of = move |c: CurrencyCode| {
            if c == czk() {
                Some(Decimal::ONE)
            } else if c == eur() {
                Some(destination_rate)
            } else {
                Some(source_rate)
            }
        };

        let plan = TransactionEngine::plan_transfer(
            &source,
            true,
            &destination,
            Money::new(amount, czk()),
            rate_of,
        );

        prop_assert!(plan.is_ok());
        let plan = plan.unwrap();

        // Half a cent of rounding slack on the credited side.
        let debited_in_base = plan.debit;
        let credited_in_base = plan.credit * destination_rate;
        let slack = destination_rate * dec!(0.005);
        prop_assert!((debited_in_base - credited_in_base).abs() <= slack);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Midpoint fee rounding goes to the even cent.
    #[test]
    fn test_fee_rounding_midpoint() {
        let account = account_with(czk(), dec!(10));
        let plan = TransactionEngine::plan_withdrawal(
            &account,
            Money::new(dec!(10.15), czk()),
            |_| Some(Decimal::ONE),
        )
        .unwrap();

        assert_eq!(plan.fee, dec!(0.02));
    }
}
