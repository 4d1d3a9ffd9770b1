//! The bank facade: plans transactions, applies them under locks, and
//! records them in the ledger.
//!
//! Every money operation follows the same shape: snapshot the rates,
//! take the registry read lock, lock the accounts involved (in ascending
//! id order when there are two), plan against the locked state, apply,
//! append to the ledger, release. Rejections happen before any balance
//! is touched, so a refused operation leaves no trace.

use std::sync::Arc;

use chrono::Utc;
use koruna_core::currency::ExchangeRate;
use koruna_core::engine::{EngineError, TransactionEngine};
use koruna_core::ledger::TransactionRecord;
use koruna_shared::types::{AccountNumber, BankAccountId, CurrencyCode, Money, UserAccountId};

use crate::accounts::AccountStore;
use crate::ledger::Ledger;
use crate::rates::{RateTable, RatesError};

/// Entry point for all money movements.
#[derive(Clone)]
pub struct BankService {
    accounts: Arc<AccountStore>,
    ledger: Arc<Ledger>,
    rates: Arc<RateTable>,
}

impl BankService {
    /// Wires the service to its stores.
    #[must_use]
    pub fn new(accounts: Arc<AccountStore>, ledger: Arc<Ledger>, rates: Arc<RateTable>) -> Self {
        Self {
            accounts,
            ledger,
            rates,
        }
    }

    /// The account registry.
    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// The transaction ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The exchange rate table.
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Deposits `money` into the given account, converting into the
    /// account currency when they differ.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AccountNotFound`] for unknown accounts, plus
    /// the validation and rate errors of planning. Deposits are never
    /// refused for balance reasons.
    pub async fn deposit(
        &self,
        account: BankAccountId,
        money: Money,
    ) -> Result<TransactionRecord, EngineError> {
        let lookup = self.rates.lookup().await;
        let registry = self.accounts.registry.read().await;
        let handle = registry
            .accounts
            .get(&account)
            .ok_or(EngineError::AccountNotFound(account))?;
        let mut state = handle.lock().await;

        let plan =
            TransactionEngine::plan_deposit(&state, money, |currency| lookup.rate_of(currency))?;
        state.balance += plan.credit;

        let record = TransactionRecord::deposit(account, money.amount, money.currency, Utc::now());
        self.ledger.append(record.clone()).await;
        tracing::info!(
            account = %account,
            amount = %money.amount,
            currency = %money.currency,
            credited = %plan.credit,
            balance = %state.balance,
            "deposit settled"
        );
        Ok(record)
    }

    /// Withdraws `money` from the given account.
    ///
    /// The debit may exceed the balance by up to ten percent of it; the
    /// uncovered part carries a ten percent fee.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientFunds`] past the overdraft
    /// limit, [`EngineError::AccountNotFound`] for unknown accounts, plus
    /// the validation and rate errors of planning.
    pub async fn withdraw(
        &self,
        account: BankAccountId,
        money: Money,
    ) -> Result<TransactionRecord, EngineError> {
        let lookup = self.rates.lookup().await;
        let registry = self.accounts.registry.read().await;
        let handle = registry
            .accounts
            .get(&account)
            .ok_or(EngineError::AccountNotFound(account))?;
        let mut state = handle.lock().await;

        let plan =
            TransactionEngine::plan_withdrawal(&state, money, |currency| lookup.rate_of(currency))?;
        state.balance = plan.new_balance;

        let record = TransactionRecord::withdrawal(
            account,
            money.amount,
            money.currency,
            plan.fee,
            Utc::now(),
        );
        self.ledger.append(record.clone()).await;
        tracing::info!(
            account = %account,
            amount = %money.amount,
            currency = %money.currency,
            debited = %plan.debit,
            fee = %plan.fee,
            balance = %state.balance,
            "withdrawal settled"
        );
        Ok(record)
    }

    /// Transfers `money` from one of the sender's accounts to the account
    /// with the given number.
    ///
    /// The funding account is the sender's oldest account in the requested
    /// currency whose balance covers the amount; failing that, their
    /// primary account, converting and drawing on the overdraft allowance
    /// as needed. The destination is credited in its own currency. The
    /// ledger records the amount as requested.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UserNotFound`] or
    /// [`EngineError::UnknownAccountNumber`] for unknown parties,
    /// [`EngineError::NoPrimaryAccount`] when no account can fund the
    /// transfer, [`EngineError::InsufficientFunds`] past the overdraft
    /// limit, plus the validation and rate errors of planning.
    pub async fn transfer(
        &self,
        user: UserAccountId,
        destination: &AccountNumber,
        money: Money,
    ) -> Result<TransactionRecord, EngineError> {
        let lookup = self.rates.lookup().await;
        let registry = self.accounts.registry.read().await;

        let sender = registry
            .users
            .get(&user)
            .ok_or(EngineError::UserNotFound(user))?;
        let destination_id = *registry
            .numbers
            .get(destination)
            .ok_or_else(|| EngineError::UnknownAccountNumber(destination.clone()))?;

        // Funding selection works on a snapshot taken in opening order.
        // The chosen branch is re-checked against the locked state below.
        let owned = registry.owned.get(&user).cloned().unwrap_or_default();
        let mut snapshots = Vec::with_capacity(owned.len());
        for (id, _) in &owned {
            if let Some(handle) = registry.accounts.get(id) {
                snapshots.push(handle.lock().await.clone());
            }
        }
        let route =
            TransactionEngine::resolve_funding(user, &snapshots, sender.primary_account, money)?;
        let source_id = route.account();
        let source_is_primary = sender.primary_account == Some(source_id);

        let source_handle = registry
            .accounts
            .get(&source_id)
            .ok_or(EngineError::AccountNotFound(source_id))?;
        let destination_handle = registry
            .accounts
            .get(&destination_id)
            .ok_or(EngineError::AccountNotFound(destination_id))?;

        // The append happens before the account locks release, as in
        // deposit and withdraw, so balances and ledger move as one unit.
        let record = if source_id == destination_id {
            let mut state = source_handle.lock().await;
            let plan = TransactionEngine::plan_transfer(
                &state,
                source_is_primary,
                &state,
                money,
                |currency| lookup.rate_of(currency),
            )?;
            state.balance = plan.source_new_balance + plan.credit;
            let record = TransactionRecord::transfer(
                source_id,
                destination_id,
                money.amount,
                money.currency,
                plan.fee,
                Utc::now(),
            );
            self.ledger.append(record.clone()).await;
            record
        } else {
            // Lock both sides in ascending id order so two opposing
            // transfers cannot deadlock.
            let (mut source_state, mut destination_state) =
                if source_id.into_inner() < destination_id.into_inner() {
                    let source_state = source_handle.lock().await;
                    let destination_state = destination_handle.lock().await;
                    (source_state, destination_state)
                } else {
                    let destination_state = destination_handle.lock().await;
                    let source_state = source_handle.lock().await;
                    (source_state, destination_state)
                };
            let plan = TransactionEngine::plan_transfer(
                &source_state,
                source_is_primary,
                &destination_state,
                money,
                |currency| lookup.rate_of(currency),
            )?;
            source_state.balance = plan.source_new_balance;
            destination_state.balance += plan.credit;
            let record = TransactionRecord::transfer(
                plan.source,
                plan.destination,
                money.amount,
                money.currency,
                plan.fee,
                Utc::now(),
            );
            self.ledger.append(record.clone()).await;
            record
        };

        tracing::info!(
            source = %record.source,
            destination = %record.destination,
            amount = %money.amount,
            currency = %money.currency,
            fee = %record.overdraft_fee,
            "transfer settled"
        );
        Ok(record)
    }

    /// The most recent transactions touching `account`, newest first.
    pub async fn recent_activity(
        &self,
        account: BankAccountId,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        self.ledger.recent_for_account(account, limit).await
    }

    /// Converts `money` into `target` at the current rates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCurrency`] when either side has no
    /// quoted rate, or a validation error for malformed amounts.
    pub async fn convert(&self, money: Money, target: CurrencyCode) -> Result<Money, EngineError> {
        self.rates.convert(money, target).await
    }

    /// Refreshes the rate table from the daily feed.
    ///
    /// # Errors
    ///
    /// Returns [`RatesError`] when the feed cannot be fetched or parsed;
    /// the previous quotes stay in place.
    pub async fn refresh_rates(&self) -> Result<usize, RatesError> {
        self.rates.refresh().await
    }

    /// Every currently quoted rate, ordered by currency code.
    pub async fn exchange_rates(&self) -> Vec<ExchangeRate> {
        self.rates.snapshot().await
    }
}
