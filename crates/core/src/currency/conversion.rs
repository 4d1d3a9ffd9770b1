//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Every conversion routes through the base currency
//! - Round exactly once, after the full conversion
//! - Use banker's rounding (round half to even)

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Number of decimal places every monetary result is rounded to.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds a monetary value to [`CURRENCY_SCALE`] decimal places.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Converts an amount between two currencies via the base currency.
///
/// Both rates quote one unit of their currency in the base currency. The
/// amount is first expressed in the base currency, then in the target, and
/// only the final result is rounded. Rounding the intermediate value too
/// would lose sub-cent precision for weak currencies.
#[must_use]
pub fn convert_via_base(amount: Decimal, source_rate: Decimal, target_rate: Decimal) -> Decimal {
    let in_base = amount * source_rate;
    round_currency(in_base / target_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_into_base() {
        // 100 EUR at 24.50 CZK/EUR, target CZK at rate 1
        let result = convert_via_base(dec!(100), dec!(24.50), dec!(1));
        assert_eq!(result, dec!(2450.00));
    }

    #[test]
    fn test_convert_out_of_base() {
        // 2450 CZK into EUR at 24.50 CZK/EUR
        let result = convert_via_base(dec!(2450), dec!(1), dec!(24.50));
        assert_eq!(result, dec!(100.00));
    }

    #[test]
    fn test_convert_cross_currency() {
        // 100 EUR -> CZK -> USD: 100 * 24.50 / 22.80 = 107.456... -> 107.46
        let result = convert_via_base(dec!(100), dec!(24.50), dec!(22.80));
        assert_eq!(result, dec!(107.46));
    }

    #[test]
    fn test_rounds_once_at_the_end() {
        // 1 IDR at 0.005 CZK is worth 0.00649... of a 0.77 currency.
        // Rounding the intermediate 0.005 CZK first would collapse it to
        // zero; a single final rounding keeps the cent.
        let result = convert_via_base(dec!(1), dec!(0.005), dec!(0.77));
        assert_eq!(result, dec!(0.01));
    }

    #[test]
    fn test_bankers_rounding() {
        // Midpoints round half to even: 0.125 -> 0.12, 0.135 -> 0.14
        assert_eq!(round_currency(dec!(0.125)), dec!(0.12));
        assert_eq!(round_currency(dec!(0.135)), dec!(0.14));
    }

    #[test]
    fn test_same_rate_is_identity_for_cent_amounts() {
        let result = convert_via_base(dec!(123.45), dec!(24.50), dec!(24.50));
        assert_eq!(result, dec!(123.45));
    }
}
