//! PostgreSQL Transaction Store
//!
//! Persists transactions in the `transactions` table. Every call checks a
//! connection out of the pool and returns it when the query completes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Money, Transaction, TransactionType};

use super::{StoreError, TransactionRepository};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, type, amount, currency, occurred_at, created_at,
           category_id, account_id, description
    FROM transactions
"#;

/// Raw `transactions` row
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    user_id: String,
    #[sqlx(rename = "type")]
    tx_type: String,
    amount: Decimal,
    currency: String,
    occurred_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    category_id: Option<String>,
    account_id: Option<String>,
    description: Option<String>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let tx_type: TransactionType = row
            .tx_type
            .parse()
            .map_err(|e| StoreError::corrupt_row(&row.id, e))?;
        let money = Money::new(row.amount, row.currency)
            .map_err(|e| StoreError::corrupt_row(&row.id, e))?;

        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            tx_type,
            money,
            occurred_at: row.occurred_at,
            created_at: row.created_at,
            category_id: row.category_id,
            account_id: row.account_id,
            description: row.description,
        })
    }
}

fn into_domain(rows: Vec<TransactionRow>) -> Result<Vec<Transaction>, StoreError> {
    rows.into_iter().map(Transaction::try_from).collect()
}

/// Transaction store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    /// Create a new repository with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl TransactionRepository for PgTransactionRepository {
    async fn add(&self, transaction: &Transaction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, type, amount, currency, occurred_at, created_at,
                category_id, account_id, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(transaction.tx_type.as_str())
        .bind(transaction.money.amount())
        .bind(transaction.money.currency())
        .bind(transaction.occurred_at)
        .bind(transaction.created_at)
        .bind(&transaction.category_id)
        .bind(&transaction.account_id)
        .bind(&transaction.description)
        .execute(&self.pool)
        .await?;

        tracing::debug!(transaction_id = %transaction.id, "Transaction row inserted");

        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> Result<Option<Transaction>, StoreError> {
        let row: Option<TransactionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(transaction_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }

    async fn list_by_user_and_categories(
        &self,
        user_id: &str,
        category_ids: &[String],
    ) -> Result<Vec<Transaction>, StoreError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND category_id = ANY($2) ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }

    async fn list_by_user_and_period(
        &self,
        user_id: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND occurred_at >= $2 AND occurred_at <= $3 \
             ORDER BY occurred_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(start_at)
        .bind(end_at)
        .fetch_all(&self.pool)
        .await?;

        into_domain(rows)
    }
}
