//! Core banking logic for Koruna.
//!
//! This crate contains pure business logic with zero I/O dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - User and bank account domain types and rules
//! - `currency` - Conversion through the base currency and rate feed parsing
//! - `engine` - Transaction planning: deposits, withdrawals, transfers
//! - `ledger` - Append-only transaction records
//! - `validation` - Typed validation of requested amounts

pub mod account;
pub mod currency;
pub mod engine;
pub mod ledger;
pub mod validation;
