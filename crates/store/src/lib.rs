//! In-memory storage and orchestration for Koruna.
//!
//! This crate keeps all mutable state behind async locks:
//! - `accounts`: user and bank account registry with one mutex per account
//! - `ledger`: append-only transaction history
//! - `rates`: exchange rate table with daily feed refresh
//! - `service`: the bank facade that plans, locks, applies, and records
//!
//! Lock order is registry, then account mutexes in ascending account id,
//! then the ledger. No path acquires them in any other order.

pub mod accounts;
pub mod ledger;
pub mod rates;
pub mod service;

pub use accounts::AccountStore;
pub use ledger::Ledger;
pub use rates::{RateLookup, RateTable, RatesError};
pub use service::BankService;
