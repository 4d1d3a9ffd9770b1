//! Overdraft allowance and fee arithmetic.
//!
//! Accounts may be drawn below zero by up to ten percent of their current
//! balance. The part of a debit not covered by the balance carries a ten
//! percent fee, charged on top of the debit itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::currency::round_currency;

/// Fraction of the balance that may be drawn beyond it.
pub const OVERDRAFT_ALLOWANCE_RATE: Decimal = dec!(0.10);

/// Fee charged on the uncovered part of a debit.
pub const OVERDRAFT_FEE_RATE: Decimal = dec!(0.10);

/// Outcome of assessing a debit against a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// Fee on the uncovered part, zero when the balance covers the debit.
    pub fee: Decimal,
    /// Balance after the debit and fee are taken.
    pub new_balance: Decimal,
}

/// The largest debit the balance can fund, overdraft included.
///
/// A negative balance yields a negative limit, so an overdrawn account
/// cannot fund anything further.
#[must_use]
pub fn withdrawable_limit(balance: Decimal) -> Decimal {
    balance + balance * OVERDRAFT_ALLOWANCE_RATE
}

/// Assesses a debit against a balance.
///
/// Returns `None` when the debit exceeds [`withdrawable_limit`]. The fee is
/// rounded to cents; the new balance stays exact because debit and fee
/// already are.
#[must_use]
pub fn assess(balance: Decimal, debit: Decimal) -> Option<Assessment> {
    if debit > withdrawable_limit(balance) {
        return None;
    }
    let shortfall = (debit - balance).max(Decimal::ZERO);
    let fee = round_currency(shortfall * OVERDRAFT_FEE_RATE);
    Some(Assessment {
        fee,
        new_balance: balance - debit - fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn covered_debits_carry_no_fee() {
        let outcome = assess(dec!(100), dec!(40)).unwrap();
        assert_eq!(outcome.fee, dec!(0.00));
        assert_eq!(outcome.new_balance, dec!(60));
    }

    #[test]
    fn overdraft_charges_ten_percent_of_the_shortfall() {
        // Balance 100, debit 110: the last 10 are uncovered, fee 1.00,
        // leaving the account at -11.00.
        let outcome = assess(dec!(100), dec!(110)).unwrap();
        assert_eq!(outcome.fee, dec!(1.00));
        assert_eq!(outcome.new_balance, dec!(-11.00));
    }

    #[test]
    fn debits_beyond_the_allowance_are_refused() {
        assert_eq!(withdrawable_limit(dec!(100)), dec!(110.0));
        assert!(assess(dec!(100), dec!(111)).is_none());
        assert!(assess(dec!(100), dec!(110.01)).is_none());
    }

    #[test]
    fn the_full_allowance_is_usable() {
        let outcome = assess(dec!(100), dec!(110)).unwrap();
        assert!(outcome.new_balance < Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(-11.00))]
    #[case(dec!(-0.01))]
    fn overdrawn_accounts_cannot_fund_anything(#[case] balance: Decimal) {
        assert!(assess(balance, dec!(0.01)).is_none());
    }

    #[test]
    fn fees_round_to_cents_half_to_even() {
        // Shortfall 0.15 -> raw fee 0.015 -> 0.02.
        let outcome = assess(dec!(10), dec!(10.15)).unwrap();
        assert_eq!(outcome.fee, dec!(0.02));

        // Shortfall 0.05 -> raw fee 0.005 -> 0.00.
        let outcome = assess(dec!(10), dec!(10.05)).unwrap();
        assert_eq!(outcome.fee, dec!(0.00));
    }

    #[test]
    fn zero_balance_allows_nothing() {
        assert_eq!(withdrawable_limit(Decimal::ZERO), Decimal::ZERO);
        assert!(assess(Decimal::ZERO, dec!(0.01)).is_none());
    }
}
