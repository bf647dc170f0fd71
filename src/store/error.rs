//! Store Errors
//!
//! Error types for transaction store operations.

/// Errors that can occur in the transaction store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer satisfies the domain rules
    #[error("Corrupt transaction row {id}: {reason}")]
    CorruptRow { id: String, reason: String },
}

impl StoreError {
    pub fn corrupt_row(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptRow {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
