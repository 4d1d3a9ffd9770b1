//! User and bank account registry.
//!
//! The registry itself sits behind one `RwLock`; every bank account
//! additionally sits behind its own `Mutex` so balance changes serialize
//! per account while unrelated accounts stay concurrent. Account
//! management takes the registry write lock, which excludes every
//! in-flight transaction at once.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use koruna_core::account::{
    ensure_closable, ensure_owned, AccountError, BankAccount, UserAccount,
};
use koruna_shared::types::{AccountNumber, BankAccountId, CurrencyCode, UserAccountId};
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one account's mutable state.
pub(crate) type AccountHandle = Arc<Mutex<BankAccount>>;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    pub(crate) users: HashMap<UserAccountId, UserAccount>,
    pub(crate) usernames: HashMap<String, UserAccountId>,
    pub(crate) accounts: HashMap<BankAccountId, AccountHandle>,
    pub(crate) numbers: HashMap<AccountNumber, BankAccountId>,
    /// Accounts per user in opening order, with their currency cached so
    /// duplicate-currency checks need no account lock.
    pub(crate) owned: HashMap<UserAccountId, Vec<(BankAccountId, CurrencyCode)>>,
    pub(crate) number_seq: u64,
}

/// In-memory registry of users and their bank accounts.
#[derive(Debug, Default)]
pub struct AccountStore {
    pub(crate) registry: RwLock<Registry>,
}

impl AccountStore {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateUsername`] if the name is taken.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UserAccount, AccountError> {
        let mut guard = self.registry.write().await;
        let registry = &mut *guard;

        if registry.usernames.contains_key(username) {
            return Err(AccountError::DuplicateUsername(username.to_owned()));
        }
        let user = UserAccount::new(username, email, Utc::now());
        registry.usernames.insert(user.username.clone(), user.id);
        registry.owned.insert(user.id, Vec::new());
        registry.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Opens a bank account for `user` in `currency`.
    ///
    /// A user holds at most one account per currency. The first account a
    /// user opens becomes their primary account.
    pub async fn open_account(
        &self,
        user: UserAccountId,
        currency: CurrencyCode,
    ) -> Result<BankAccount, AccountError> {
        let mut guard = self.registry.write().await;
        let registry = &mut *guard;

        let Some(profile) = registry.users.get_mut(&user) else {
            return Err(AccountError::UserNotFound(user));
        };
        let held = registry.owned.entry(user).or_default();
        if held.iter().any(|(_, held_currency)| *held_currency == currency) {
            return Err(AccountError::DuplicateCurrency { user, currency });
        }

        let number = AccountNumber::from_sequence(registry.number_seq);
        registry.number_seq += 1;
        let account = BankAccount::new(number, user, currency, Utc::now());

        held.push((account.id, currency));
        if profile.primary_account.is_none() {
            profile.primary_account = Some(account.id);
        }
        registry.numbers.insert(account.number.clone(), account.id);
        registry
            .accounts
            .insert(account.id, Arc::new(Mutex::new(account.clone())));
        Ok(account)
    }

    /// Closes an account and removes it from the registry.
    ///
    /// Only the owner may close an account, and only once its balance is
    /// exactly zero. Closing the primary account leaves the user without
    /// a primary until they designate another.
    pub async fn close_account(
        &self,
        user: UserAccountId,
        account: BankAccountId,
    ) -> Result<BankAccount, AccountError> {
        let mut guard = self.registry.write().await;
        let registry = &mut *guard;

        let Some(handle) = registry.accounts.get(&account) else {
            return Err(AccountError::AccountNotFound(account));
        };
        // The write lock excludes transactions, so this lock is uncontended.
        let closed = {
            let state = handle.lock().await;
            ensure_owned(&state, user)?;
            ensure_closable(&state)?;
            state.clone()
        };

        registry.accounts.remove(&account);
        registry.numbers.remove(&closed.number);
        if let Some(held) = registry.owned.get_mut(&user) {
            held.retain(|(id, _)| *id != account);
        }
        if let Some(profile) = registry.users.get_mut(&user)
            && profile.primary_account == Some(account)
        {
            profile.primary_account = None;
        }
        Ok(closed)
    }

    /// Designates `account` as the user's primary account.
    pub async fn set_primary(
        &self,
        user: UserAccountId,
        account: BankAccountId,
    ) -> Result<(), AccountError> {
        let mut guard = self.registry.write().await;
        let registry = &mut *guard;

        let Some(profile) = registry.users.get_mut(&user) else {
            return Err(AccountError::UserNotFound(user));
        };
        let Some(handle) = registry.accounts.get(&account) else {
            return Err(AccountError::AccountNotFound(account));
        };
        ensure_owned(&*handle.lock().await, user)?;
        profile.primary_account = Some(account);
        Ok(())
    }

    /// The user's primary account, if one is designated.
    pub async fn primary_account(&self, user: UserAccountId) -> Result<BankAccount, AccountError> {
        let registry = self.registry.read().await;
        let profile = registry
            .users
            .get(&user)
            .ok_or(AccountError::UserNotFound(user))?;
        let primary = profile
            .primary_account
            .ok_or(AccountError::NoPrimaryAccount(user))?;
        let handle = registry
            .accounts
            .get(&primary)
            .ok_or(AccountError::AccountNotFound(primary))?;
        Ok(handle.lock().await.clone())
    }

    /// Snapshots every account of `user` in opening order.
    pub async fn accounts_of(&self, user: UserAccountId) -> Result<Vec<BankAccount>, AccountError> {
        let registry = self.registry.read().await;
        if !registry.users.contains_key(&user) {
            return Err(AccountError::UserNotFound(user));
        }
        let held = registry.owned.get(&user).cloned().unwrap_or_default();
        let mut accounts = Vec::with_capacity(held.len());
        for (id, _) in held {
            if let Some(handle) = registry.accounts.get(&id) {
                accounts.push(handle.lock().await.clone());
            }
        }
        Ok(accounts)
    }

    /// Snapshots one account by id.
    pub async fn account(&self, id: BankAccountId) -> Result<BankAccount, AccountError> {
        let registry = self.registry.read().await;
        let handle = registry
            .accounts
            .get(&id)
            .ok_or(AccountError::AccountNotFound(id))?;
        Ok(handle.lock().await.clone())
    }

    /// Looks an account up by its customer-facing number.
    pub async fn find_by_number(&self, number: &AccountNumber) -> Option<BankAccount> {
        let registry = self.registry.read().await;
        let id = registry.numbers.get(number)?;
        let handle = registry.accounts.get(id)?;
        Some(handle.lock().await.clone())
    }

    /// Fetches a user's profile.
    pub async fn user(&self, id: UserAccountId) -> Result<UserAccount, AccountError> {
        self.registry
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(AccountError::UserNotFound(id))
    }

    /// Looks a user up by username.
    pub async fn find_user(&self, username: &str) -> Option<UserAccount> {
        let registry = self.registry.read().await;
        let id = registry.usernames.get(username)?;
        registry.users.get(id).cloned()
    }

    /// Provisions an OTP secret for the user and activates verification.
    pub async fn enable_otp(
        &self,
        user: UserAccountId,
        secret: String,
    ) -> Result<(), AccountError> {
        let mut registry = self.registry.write().await;
        let profile = registry
            .users
            .get_mut(&user)
            .ok_or(AccountError::UserNotFound(user))?;
        profile.enable_otp(secret);
        Ok(())
    }

    /// Deactivates OTP verification for the user.
    pub async fn disable_otp(&self, user: UserAccountId) -> Result<(), AccountError> {
        let mut registry = self.registry.write().await;
        let profile = registry
            .users
            .get_mut(&user)
            .ok_or(AccountError::UserNotFound(user))?;
        profile.disable_otp();
        Ok(())
    }
}
