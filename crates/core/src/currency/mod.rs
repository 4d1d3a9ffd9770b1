//! Currency conversion through the base currency and rate feed parsing.

pub mod conversion;
pub mod feed;
pub mod rate;

pub use conversion::{convert_via_base, round_currency, CURRENCY_SCALE};
pub use feed::{parse_daily_feed, FeedError};
pub use rate::{ExchangeRate, RateError};
