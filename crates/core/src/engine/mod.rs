//! Transaction planning: deposits, withdrawals, transfers.
//!
//! The engine is pure: it looks at account state and exchange rates and
//! produces a plan describing exactly which balances change and by how
//! much. Applying a plan, locking, and recording are the store's job.

pub mod error;
pub mod overdraft;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::EngineError;
pub use service::{convert_money, TransactionEngine};
pub use types::{DepositPlan, FundingRoute, TransferPlan, WithdrawalPlan};
