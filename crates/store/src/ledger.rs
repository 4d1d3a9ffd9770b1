//! Append-only transaction history.

use koruna_core::ledger::TransactionRecord;
use koruna_shared::types::BankAccountId;
use tokio::sync::RwLock;

/// How many records a history query returns when no limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Append-only store of settled transactions.
///
/// Records are never updated or deleted. Order of insertion is the order
/// of settlement, so "recent" means scanning from the back.
#[derive(Debug, Default)]
pub struct Ledger {
    pub(crate) records: RwLock<Vec<TransactionRecord>>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a settled transaction. Only the bank service appends.
    pub(crate) async fn append(&self, record: TransactionRecord) {
        self.records.write().await.push(record);
    }

    /// Returns the most recent transactions touching `account`, newest first.
    pub async fn recent_for_account(
        &self,
        account: BankAccountId,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .filter(|record| record.involves(account))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Every record in settlement order, for audits and tests.
    pub async fn all(&self) -> Vec<TransactionRecord> {
        self.records.read().await.clone()
    }

    /// Number of settled transactions.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing has settled yet.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use koruna_shared::types::CurrencyCode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn czk() -> CurrencyCode {
        CurrencyCode::new("CZK").unwrap()
    }

    #[tokio::test]
    async fn starts_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty().await);
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test]
    async fn recent_returns_newest_first() {
        let ledger = Ledger::new();
        let account = BankAccountId::new();
        for i in 1..=3 {
            let record =
                TransactionRecord::deposit(account, dec!(10) * Decimal::from(i), czk(), Utc::now());
            ledger.append(record).await;
        }

        let recent = ledger.recent_for_account(account, DEFAULT_RECENT_LIMIT).await;
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount, dec!(30));
        assert_eq!(recent[2].amount, dec!(10));
    }

    #[tokio::test]
    async fn recent_filters_by_involvement() {
        let ledger = Ledger::new();
        let mine = BankAccountId::new();
        let theirs = BankAccountId::new();
        let other = BankAccountId::new();

        ledger
            .append(TransactionRecord::deposit(mine, dec!(100), czk(), Utc::now()))
            .await;
        ledger
            .append(TransactionRecord::deposit(other, dec!(999), czk(), Utc::now()))
            .await;
        ledger
            .append(TransactionRecord::transfer(
                theirs,
                mine,
                dec!(25),
                czk(),
                dec!(0),
                Utc::now(),
            ))
            .await;

        let recent = ledger.recent_for_account(mine, DEFAULT_RECENT_LIMIT).await;
        assert_eq!(recent.len(), 2);
        // The incoming transfer counts even though `mine` is the destination.
        assert_eq!(recent[0].amount, dec!(25));
        assert_eq!(recent[1].amount, dec!(100));
    }

    #[tokio::test]
    async fn recent_respects_limit() {
        let ledger = Ledger::new();
        let account = BankAccountId::new();
        for _ in 0..15 {
            ledger
                .append(TransactionRecord::deposit(account, dec!(1), czk(), Utc::now()))
                .await;
        }

        let recent = ledger.recent_for_account(account, DEFAULT_RECENT_LIMIT).await;
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
    }
}
