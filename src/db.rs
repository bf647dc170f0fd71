//! Database module
//!
//! Connection checks and schema bootstrap for the `transactions` table.

use sqlx::PgPool;

/// Idempotent DDL for the transactions table
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL,
        type        TEXT NOT NULL CHECK (type IN ('expense', 'income')),
        amount      NUMERIC NOT NULL CHECK (amount > 0),
        currency    TEXT NOT NULL CHECK (char_length(currency) = 3),
        occurred_at TIMESTAMPTZ NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        category_id TEXT NULL,
        account_id  TEXT NULL,
        description VARCHAR(500) NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_transactions_user_id ON transactions (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_transactions_occurred_at ON transactions (occurred_at)",
    "CREATE INDEX IF NOT EXISTS ix_transactions_category_id ON transactions (category_id)",
    "CREATE INDEX IF NOT EXISTS ix_transactions_account_id ON transactions (account_id)",
];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create the transactions table and its indexes if missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::info!("Database schema verified: transactions");
    Ok(())
}

/// Check if the transactions table exists
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = 'transactions'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !exists {
        tracing::error!("Required table 'transactions' does not exist");
    }

    Ok(exists)
}
