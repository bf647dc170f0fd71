//! In-memory Transaction Store
//!
//! Keeps transactions in insertion order behind a lock. Used by tests and for
//! running the API without a database.

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::domain::Transaction;

use super::{StoreError, TransactionRepository};

/// Transaction store held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionRepository {
    items: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Transaction>> {
        // A poisoned lock still holds consistent data: writers only push.
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Newest-inserted first, then stable-sorted by `key` descending so ties
    /// keep the most recent insert on top.
    fn select<K, F>(&self, filter: F, key: K) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
        K: Fn(&Transaction) -> DateTime<Utc>,
    {
        let mut selected: Vec<Transaction> =
            self.read().iter().rev().filter(|&tx| filter(tx)).cloned().collect();
        selected.sort_by(|a, b| key(b).cmp(&key(a)));
        selected
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    async fn add(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(transaction.clone());
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .read()
            .iter()
            .find(|tx| tx.id == transaction_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.select(|tx| tx.user_id == user_id, |tx| tx.created_at))
    }

    async fn list_by_user_and_categories(
        &self,
        user_id: &str,
        category_ids: &[String],
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.select(
            |tx| {
                tx.user_id == user_id
                    && tx
                        .category_id
                        .as_ref()
                        .is_some_and(|category| category_ids.contains(category))
            },
            |tx| tx.created_at,
        ))
    }

    async fn list_by_user_and_period(
        &self,
        user_id: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.select(
            |tx| tx.user_id == user_id && start_at <= tx.occurred_at && tx.occurred_at <= end_at,
            |tx| tx.occurred_at,
        ))
    }
}
