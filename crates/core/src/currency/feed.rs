//! Parser for the Czech National Bank daily exchange rate feed.
//!
//! The feed is plain text: a date banner, a header line, then one
//! pipe-separated row per currency:
//!
//! ```text
//! 22.08.2026 #162
//! země|měna|množství|kód|kurz
//! Austrálie|dolar|1|AUD|14,813
//! Maďarsko|forint|100|HUF|6,252
//! ```
//!
//! Rates use a decimal comma and are quoted per `množství` (amount) units,
//! so the forint row above means 100 HUF = 6.252 CZK. Parsed rates are
//! normalized to one unit of the quoted currency.

use chrono::{DateTime, Utc};
use koruna_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use super::rate::{ExchangeRate, RateError};

const FIELDS_PER_ROW: usize = 5;

/// Errors raised while parsing the daily feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed contained no parsable data rows.
    #[error("feed contains no data rows")]
    Empty,

    /// A data row did not have the expected five pipe-separated fields.
    #[error("line {line}: expected {FIELDS_PER_ROW} pipe-separated fields")]
    MalformedRow {
        /// 1-based line number in the feed body.
        line: usize,
    },

    /// The quotation amount column was not a positive integer.
    #[error("line {line}: invalid quotation amount {value:?}")]
    InvalidAmount {
        /// 1-based line number in the feed body.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// The rate column was not a decimal number.
    #[error("line {line}: invalid rate {value:?}")]
    InvalidRate {
        /// 1-based line number in the feed body.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// The currency code column was not a three-letter code.
    #[error("line {line}: {source}")]
    InvalidCode {
        /// 1-based line number in the feed body.
        line: usize,
        /// The underlying parse failure.
        #[source]
        source: koruna_shared::types::CurrencyCodeError,
    },

    /// The normalized rate was not usable.
    #[error("line {line}: {source}")]
    Rate {
        /// 1-based line number in the feed body.
        line: usize,
        /// The underlying rate failure.
        #[source]
        source: RateError,
    },
}

/// Parses the daily feed body into per-unit exchange rates.
///
/// The first two lines (date banner and column header) are skipped, as are
/// blank lines. All remaining rows must parse; a single malformed row fails
/// the whole feed so a partial refresh can never be applied.
///
/// # Errors
///
/// Returns [`FeedError`] describing the first offending line, or
/// [`FeedError::Empty`] if no data rows were found.
pub fn parse_daily_feed(
    body: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<ExchangeRate>, FeedError> {
    let mut rates = Vec::new();

    for (index, raw_line) in body.lines().enumerate().skip(2) {
        let line = index + 1;
        let row = raw_line.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split('|').collect();
        if fields.len() != FIELDS_PER_ROW {
            return Err(FeedError::MalformedRow { line });
        }

        // země|měna|množství|kód|kurz - country and currency name are
        // display-only and not carried further.
        let amount: u32 = fields[2]
            .trim()
            .parse()
            .map_err(|_| FeedError::InvalidAmount {
                line,
                value: fields[2].to_string(),
            })?;
        if amount == 0 {
            return Err(FeedError::InvalidAmount {
                line,
                value: fields[2].to_string(),
            });
        }

        let code = CurrencyCode::new(fields[3].trim())
            .map_err(|source| FeedError::InvalidCode { line, source })?;

        let quoted: Decimal = fields[4]
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| FeedError::InvalidRate {
                line,
                value: fields[4].to_string(),
            })?;

        let per_unit = quoted / Decimal::from(amount);
        let rate = ExchangeRate::new(code, per_unit, fetched_at)
            .map_err(|source| FeedError::Rate { line, source })?;
        rates.push(rate);
    }

    if rates.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
22.08.2026 #162
země|měna|množství|kód|kurz
Austrálie|dolar|1|AUD|14,813
EMU|euro|1|EUR|24,500
Maďarsko|forint|100|HUF|6,252
Japonsko|jen|100|JPY|15,384
";

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    #[test]
    fn parses_the_sample_feed() {
        let rates = parse_daily_feed(SAMPLE, Utc::now()).unwrap();
        assert_eq!(rates.len(), 4);

        assert_eq!(rates[0].currency, code("AUD"));
        assert_eq!(rates[0].rate, dec!(14.813));

        assert_eq!(rates[1].currency, code("EUR"));
        assert_eq!(rates[1].rate, dec!(24.500));
    }

    #[test]
    fn normalizes_rates_quoted_per_hundred_units() {
        let rates = parse_daily_feed(SAMPLE, Utc::now()).unwrap();

        // 100 HUF = 6.252 CZK, so one forint is 0.06252 CZK.
        assert_eq!(rates[2].currency, code("HUF"));
        assert_eq!(rates[2].rate, dec!(0.06252));

        assert_eq!(rates[3].currency, code("JPY"));
        assert_eq!(rates[3].rate, dec!(0.15384));
    }

    #[test]
    fn skips_blank_lines() {
        let body = "banner\nheader\n\nEMU|euro|1|EUR|24,500\n\n";
        let rates = parse_daily_feed(body, Utc::now()).unwrap();
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn rejects_rows_with_missing_fields() {
        let body = "banner\nheader\nEMU|euro|1|EUR\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::MalformedRow { line: 3 })
        ));
    }

    #[test]
    fn rejects_bad_amounts() {
        let body = "banner\nheader\nEMU|euro|zero|EUR|24,500\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::InvalidAmount { line: 3, .. })
        ));

        let body = "banner\nheader\nEMU|euro|0|EUR|24,500\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::InvalidAmount { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_bad_rates() {
        let body = "banner\nheader\nEMU|euro|1|EUR|n/a\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::InvalidRate { line: 3, .. })
        ));

        let body = "banner\nheader\nEMU|euro|1|EUR|-24,500\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::Rate { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_bad_currency_codes() {
        let body = "banner\nheader\nEMU|euro|1|EURO|24,500\n";
        assert!(matches!(
            parse_daily_feed(body, Utc::now()),
            Err(FeedError::InvalidCode { line: 3, .. })
        ));
    }

    #[test]
    fn rejects_feeds_without_data() {
        assert!(matches!(
            parse_daily_feed("banner\nheader\n", Utc::now()),
            Err(FeedError::Empty)
        ));
        assert!(matches!(parse_daily_feed("", Utc::now()), Err(FeedError::Empty)));
    }
}
