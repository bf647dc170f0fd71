//! Transaction entity
//!
//! An expense or income record. Transactions are immutable once created:
//! there is no update or delete.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{DomainError, Money};

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Sub-second digits kept on timestamps (PostgreSQL `timestamptz` precision)
const TIMESTAMP_PRECISION: u16 = 6;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// Wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(DomainError::validation(format!(
                "Unsupported transaction type: {}",
                other
            ))),
        }
    }
}

/// Fields supplied by the caller when creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub tx_type: TransactionType,
    pub money: Money,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub tx_type: TransactionType,
    pub money: Money,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
}

impl Transaction {
    /// Validate the input and stamp a fresh id and `created_at`.
    ///
    /// # Errors
    /// `DomainError::Validation` if `user_id` is empty or the description is
    /// longer than 500 characters.
    pub fn create(new: NewTransaction) -> Result<Self, DomainError> {
        if new.user_id.is_empty() {
            return Err(DomainError::validation("user_id is required"));
        }

        if let Some(description) = &new.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::validation(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            tx_type: new.tx_type,
            money: new.money,
            occurred_at: new.occurred_at.trunc_subsecs(TIMESTAMP_PRECISION),
            created_at: Utc::now().trunc_subsecs(TIMESTAMP_PRECISION),
            category_id: new.category_id,
            account_id: new.account_id,
            description: new.description,
        })
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    pub fn amount(&self) -> rust_decimal::Decimal {
        self.money.amount()
    }
}
