//! Common types used across the application.

pub mod account_number;
pub mod id;
pub mod money;

pub use account_number::{AccountNumber, AccountNumberError};
pub use id::*;
pub use money::{CurrencyCode, CurrencyCodeError, Money};
