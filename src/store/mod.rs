//! Transaction Store module
//!
//! Persistence layer for transactions. The service only depends on the
//! [`TransactionRepository`] trait; PostgreSQL and in-memory backends are
//! provided.

mod error;
mod memory;
mod postgres;

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::domain::Transaction;

pub use error::StoreError;
pub use memory::InMemoryTransactionRepository;
pub use postgres::PgTransactionRepository;

/// Storage for transactions.
///
/// Handles are cheap to clone and share the same underlying storage. An
/// `add` followed by any read on the same handle observes the new row.
pub trait TransactionRepository: Clone + Send + Sync + 'static {
    /// Persist a transaction. Durable once the future resolves.
    fn add(&self, transaction: &Transaction) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch a transaction by id
    fn get(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = Result<Option<Transaction>, StoreError>> + Send;

    /// All transactions of a user, newest `created_at` first
    fn list_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Transactions of a user whose category is any of `category_ids`,
    /// newest `created_at` first. An empty id list matches nothing.
    fn list_by_user_and_categories(
        &self,
        user_id: &str,
        category_ids: &[String],
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Transactions of a user with `start_at <= occurred_at <= end_at`,
    /// newest `occurred_at` first
    fn list_by_user_and_period(
        &self,
        user_id: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;
}
